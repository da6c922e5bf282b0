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

const WIDTH: usize = 79;
const BORDER: char = '+';

/// Render a boxed title, suitable as the first message of a log file.
///
/// The box is 79 columns wide and framed with `+`. Text of up to 39 characters is centered on
/// its own row; longer text is left out and only the empty frame is drawn.
///
/// # Examples
///
/// ```
/// let title = logsink::layout::banner("startup");
/// assert!(title.starts_with('\n'));
/// assert!(title.contains("startup"));
/// ```
pub fn banner(text: &str) -> String {
    let len = text.chars().count();
    let edge = BORDER.to_string().repeat(WIDTH);
    let empty = format!("{BORDER}{BORDER:>width$}", width = WIDTH - 1);

    let mut out = String::with_capacity(WIDTH * 6);
    out.push('\n');
    out.push_str(&edge);
    out.push('\n');
    out.push_str(&empty);
    out.push('\n');

    if len <= WIDTH / 2 {
        let text_pos = (WIDTH - 2 + len) / 2;
        let sep_pos = WIDTH - 1 - text_pos;
        out.push(BORDER);
        out.push_str(&format!("{text:>text_pos$}{BORDER:>sep_pos$}"));
        out.push('\n');
        out.push_str(&empty);
        out.push('\n');
    }

    out.push_str(&edge);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_layout() {
        let title = banner("logsink");
        let lines: Vec<&str> = title.split('\n').collect();
        // leading blank line, five rows, trailing empty split
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "+".repeat(79));
        assert_eq!(lines[2], format!("+{}+", " ".repeat(77)));
        assert_eq!(lines[3].len(), 79);
        assert_eq!(lines[3].trim_matches(|c| c == '+' || c == ' '), "logsink");
        assert_eq!(lines[4], lines[2]);
        assert_eq!(lines[5], lines[1]);
        assert_eq!(lines[6], "");
    }

    #[test]
    fn test_even_length_text_keeps_width() {
        let widest = "y".repeat(39);
        for text in ["ab", "2018/05/20 15:14", widest.as_str()] {
            let title = banner(text);
            let widths: Vec<usize> = title.lines().skip(1).map(|l| l.chars().count()).collect();
            assert_eq!(widths, vec![79; 5], "{text:?}");
            let row = title.lines().nth(3).unwrap();
            assert!(row.starts_with('+') && row.ends_with('+'));
            assert_eq!(row.trim_matches(|c| c == '+' || c == ' '), text);
        }
    }

    #[test]
    fn test_long_text_is_omitted() {
        let text = "x".repeat(40);
        let title = banner(&text);
        assert!(!title.contains(&text));
        assert_eq!(title.lines().count(), 4);
    }
}
