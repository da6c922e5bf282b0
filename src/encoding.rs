// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversion between narrow (charset encoded), wide (UTF-16) and UTF-8 text.
//!
//! Every fallible conversion either yields the complete output or an [`Error`] of kind
//! [`ErrorKind::Encoding`]; partial output is never returned.

use std::env;
use std::fmt;

use encoding_rs::DecoderResult;
use encoding_rs::EncoderResult;
use encoding_rs::Encoding;

use crate::Error;
use crate::ErrorKind;

/// Granularity by which conversion buffers grow.
const CHUNK: usize = 8192;

/// A narrow character encoding.
///
/// # Examples
///
/// ```
/// use logsink::encoding::Charset;
///
/// let gbk = Charset::for_label("gb2312").unwrap();
/// assert_eq!(gbk.name(), "GBK");
/// assert_eq!(Charset::from_locale("ja_JP.SJIS").name(), "Shift_JIS");
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::utf8()
    }
}

impl Charset {
    /// The UTF-8 charset.
    pub fn utf8() -> Charset {
        Charset(encoding_rs::UTF_8)
    }

    /// Look up a charset by its WHATWG label, such as `gbk`, `shift_jis` or `windows-1252`.
    pub fn for_label(label: &str) -> Option<Charset> {
        Encoding::for_label(label.trim().as_bytes()).map(Charset)
    }

    /// The charset of the process locale.
    ///
    /// Consults `LC_ALL`, `LC_CTYPE` and then `LANG`; the first non-empty one wins. Falls back to
    /// UTF-8 when none is set or the codeset is not recognized.
    pub fn system() -> Charset {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty())
            .map_or_else(Charset::utf8, |locale| Charset::from_locale(&locale))
    }

    /// Derive a charset from a POSIX locale name like `zh_CN.GB18030` or `de_DE.UTF-8@euro`.
    pub fn from_locale(locale: &str) -> Charset {
        let locale = locale.split('@').next().unwrap_or_default();
        let Some((_, codeset)) = locale.split_once('.') else {
            return Charset::utf8();
        };

        if let Some(charset) = Charset::for_label(codeset) {
            return charset;
        }

        let normalized = codeset.to_ascii_lowercase().replace(['-', '_'], "");
        let label = match normalized.as_str() {
            "eucjp" => "euc-jp".to_string(),
            "euckr" => "euc-kr".to_string(),
            "euccn" => "gbk".to_string(),
            "big5hkscs" => "big5-hkscs".to_string(),
            "koi8r" => "koi8-r".to_string(),
            "koi8u" => "koi8-u".to_string(),
            other => match other.strip_prefix("iso8859") {
                Some(part) => format!("iso-8859-{part}"),
                None => return Charset::utf8(),
            },
        };
        Charset::for_label(&label).unwrap_or_else(Charset::utf8)
    }

    /// The canonical name of this charset.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Whether this charset is UTF-8, in which case narrow text is UTF-8 text.
    pub fn is_utf8(&self) -> bool {
        self.0 == encoding_rs::UTF_8
    }

    /// The charset actually produced when encoding into this charset.
    ///
    /// UTF-16 and a few special charsets cannot be produced from text, so encoding into them
    /// yields UTF-8 instead.
    pub fn output_encoding(&self) -> Charset {
        Charset(self.0.output_encoding())
    }
}

/// Encode UTF-8 text into `charset`.
pub fn utf8_to_narrow(text: &str, charset: Charset) -> Result<Vec<u8>, Error> {
    let encoding = charset.0.output_encoding();
    if encoding == encoding_rs::UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }

    let mut capacity = (text.len() * 4 + 4).max(CHUNK);
    loop {
        let mut encoder = encoding.new_encoder();
        let mut output = Vec::with_capacity(capacity);
        let (result, _) =
            encoder.encode_from_utf8_to_vec_without_replacement(text, &mut output, true);
        match result {
            EncoderResult::InputEmpty => return Ok(output),
            EncoderResult::OutputFull => capacity += CHUNK,
            EncoderResult::Unmappable(c) => {
                return Err(Error::new(
                    ErrorKind::Encoding,
                    "text is not representable in the target charset",
                )
                .with_context("charset", encoding.name())
                .with_context("char", c.escape_unicode()));
            }
        }
    }
}

/// Decode `bytes` in `charset` into UTF-8 text.
pub fn narrow_to_utf8(bytes: &[u8], charset: Charset) -> Result<String, Error> {
    let encoding = charset.0;
    let mut capacity = (bytes.len() * 3).max(CHUNK);
    loop {
        let mut decoder = encoding.new_decoder_without_bom_handling();
        let mut output = String::with_capacity(capacity);
        let (result, read) =
            decoder.decode_to_string_without_replacement(bytes, &mut output, true);
        match result {
            DecoderResult::InputEmpty => return Ok(output),
            DecoderResult::OutputFull => capacity += CHUNK,
            DecoderResult::Malformed(_, _) => {
                return Err(Error::new(
                    ErrorKind::Encoding,
                    "malformed byte sequence in source text",
                )
                .with_context("charset", encoding.name())
                .with_context("offset", read));
            }
        }
    }
}

/// Convert UTF-16 code units into UTF-8 text.
pub fn wide_to_utf8(wide: &[u16]) -> Result<String, Error> {
    String::from_utf16(wide).map_err(|err| {
        Error::new(ErrorKind::Encoding, "malformed UTF-16 text").with_source(err)
    })
}

/// Convert UTF-8 text into UTF-16 code units.
pub fn utf8_to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Decode `bytes` in `charset` into UTF-16 code units.
pub fn narrow_to_wide(bytes: &[u8], charset: Charset) -> Result<Vec<u16>, Error> {
    narrow_to_utf8(bytes, charset).map(|text| utf8_to_wide(&text))
}

/// Encode UTF-16 code units into `charset`.
pub fn wide_to_narrow(wide: &[u16], charset: Charset) -> Result<Vec<u8>, Error> {
    let text = wide_to_utf8(wide)?;
    utf8_to_narrow(&text, charset)
}

/// Re-encode `bytes` from one charset into another.
pub fn convert(to: Charset, from: Charset, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    if to.output_encoding() == from {
        return narrow_to_utf8(bytes, from).map(|_| bytes.to_vec());
    }
    let text = narrow_to_utf8(bytes, from)?;
    utf8_to_narrow(&text, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gbk() -> Charset {
        Charset::for_label("gbk").unwrap()
    }

    #[test]
    fn test_narrow_round_trip() {
        let text = "日志轮转完成";
        let narrow = utf8_to_narrow(text, gbk()).unwrap();
        assert_ne!(narrow.as_slice(), text.as_bytes());
        assert_eq!(narrow_to_utf8(&narrow, gbk()).unwrap(), text);

        let wide = utf8_to_wide(text);
        assert_eq!(wide_to_narrow(&wide, gbk()).unwrap(), narrow);
        assert_eq!(narrow_to_wide(&narrow, gbk()).unwrap(), wide);
        assert_eq!(wide_to_utf8(&wide).unwrap(), text);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        assert_eq!(utf8_to_narrow("", gbk()).unwrap(), Vec::<u8>::new());
        assert_eq!(narrow_to_utf8(&[], gbk()).unwrap(), "");
        assert_eq!(wide_to_utf8(&[]).unwrap(), "");
        assert!(utf8_to_wide("").is_empty());
    }

    #[test]
    fn test_unmappable_and_malformed_fail() {
        let latin1 = Charset::for_label("windows-1252").unwrap();
        let err = utf8_to_narrow("caf\u{e9} \u{65e5}\u{672c}", latin1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);

        let err = narrow_to_utf8(&[b'o', b'k', 0xff, 0xfe], Charset::utf8()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);

        // lone high surrogate
        let err = wide_to_utf8(&[0x0041, 0xd800]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_large_input_grows_buffer() {
        let text = "漢字かな交じり文".repeat(4096);
        let sjis = Charset::for_label("shift_jis").unwrap();
        let narrow = utf8_to_narrow(&text, sjis).unwrap();
        assert!(narrow.len() > CHUNK);
        assert_eq!(narrow_to_utf8(&narrow, sjis).unwrap(), text);
    }

    #[test]
    fn test_convert_between_charsets() {
        let sjis = Charset::for_label("shift_jis").unwrap();
        let eucjp = Charset::for_label("euc-jp").unwrap();
        let source = utf8_to_narrow("東京", sjis).unwrap();
        let converted = convert(eucjp, sjis, &source).unwrap();
        assert_eq!(narrow_to_utf8(&converted, eucjp).unwrap(), "東京");
        assert_eq!(convert(sjis, sjis, &source).unwrap(), source);
    }

    #[test]
    fn test_charset_from_locale() {
        assert_eq!(Charset::from_locale("zh_CN.GBK").name(), "GBK");
        assert_eq!(Charset::from_locale("zh_CN.gb18030").name(), "gb18030");
        assert_eq!(Charset::from_locale("ja_JP.eucJP").name(), "EUC-JP");
        assert_eq!(Charset::from_locale("ko_KR.EUC_KR").name(), "EUC-KR");
        assert_eq!(Charset::from_locale("ru_RU.ISO8859-5").name(), "ISO-8859-5");
        assert!(Charset::from_locale("de_DE.UTF-8@euro").is_utf8());
        assert!(Charset::from_locale("en_US.utf8").is_utf8());
        assert!(Charset::from_locale("C").is_utf8());
        assert!(Charset::from_locale("POSIX").is_utf8());
        assert!(Charset::from_locale("xx_YY.NOT-A-CHARSET").is_utf8());
    }

    #[test]
    fn test_utf16_charset_encodes_as_utf8() {
        let utf16 = Charset::for_label("utf-16le").unwrap();
        assert!(utf16.output_encoding().is_utf8());
        assert_eq!(utf8_to_narrow("abc", utf16).unwrap(), b"abc");
    }
}
