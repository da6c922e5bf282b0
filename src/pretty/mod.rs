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

//! Display helpers for logging containers, tuples and binary data.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use logsink::pretty::Map;
//! use logsink::pretty::Seq;
//! use logsink::pretty::Tuple;
//!
//! assert_eq!(Seq(&[1, 2, 3]).to_string(), "[1, 2, 3]");
//! let ports = BTreeMap::from([("http", 80), ("https", 443)]);
//! assert_eq!(Map(&ports).to_string(), "{http: 80, https: 443}");
//! assert_eq!(Tuple(&("id", 7)).to_string(), "(id, 7)");
//! ```

use std::fmt;

mod hexdump;

pub use self::hexdump::Offset;
pub use self::hexdump::hexdump;

/// Containers print at most this many items.
pub const MAX_ITEMS: usize = 100;

/// Display a sequence as `[a, b, c]`.
#[derive(Clone, Copy)]
pub struct Seq<I>(pub I);

impl<I> fmt::Display for Seq<I>
where
    I: IntoIterator + Copy,
    I::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_items(f, self.0, |f, item| write!(f, "{item}"))?;
        f.write_str("]")
    }
}

/// Display key/value pairs as `{k: v, k2: v2}`.
#[derive(Clone, Copy)]
pub struct Map<I>(pub I);

impl<I, K, V> fmt::Display for Map<I>
where
    I: IntoIterator<Item = (K, V)> + Copy,
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_items(f, self.0, |f, (k, v)| write!(f, "{k}: {v}"))?;
        f.write_str("}")
    }
}

/// Display a key/value pair as `k: v`.
#[derive(Clone, Copy, Debug)]
pub struct Pair<K, V>(pub K, pub V);

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}

/// Display a tuple as `(a, b, c)`.
#[derive(Clone, Copy)]
pub struct Tuple<'a, T>(pub &'a T);

macro_rules! impl_tuple_display {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: fmt::Display $(, $rest: fmt::Display)*> fmt::Display
            for Tuple<'_, ($first, $($rest,)*)>
        {
            #[allow(non_snake_case)]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let ($first, $($rest,)*) = self.0;
                write!(f, "({}", $first)?;
                $(write!(f, ", {}", $rest)?;)*
                f.write_str(")")
            }
        }
    };
}

impl_tuple_display!(A);
impl_tuple_display!(A, B);
impl_tuple_display!(A, B, C);
impl_tuple_display!(A, B, C, D);
impl_tuple_display!(A, B, C, D, E);
impl_tuple_display!(A, B, C, D, E, F);

fn write_items<I, F>(f: &mut fmt::Formatter<'_>, items: I, mut write_one: F) -> fmt::Result
where
    I: IntoIterator,
    F: FnMut(&mut fmt::Formatter<'_>, I::Item) -> fmt::Result,
{
    for (i, item) in items.into_iter().enumerate() {
        if i == MAX_ITEMS {
            return f.write_str(" ...");
        }
        if i > 0 {
            f.write_str(", ")?;
        }
        write_one(f, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_sequences() {
        let empty: [u8; 0] = [];
        assert_eq!(Seq(&empty).to_string(), "[]");
        assert_eq!(Seq(&vec!["a", "b"]).to_string(), "[a, b]");

        let many: Vec<u32> = (0..150).collect();
        let text = Seq(&many).to_string();
        assert!(text.starts_with("[0, 1, 2"));
        assert!(text.ends_with("98, 99 ...]"), "{text}");

        let exact: Vec<u32> = (0..100).collect();
        assert!(Seq(&exact).to_string().ends_with("98, 99]"));
    }

    #[test]
    fn test_maps_and_pairs() {
        let map = BTreeMap::from([("retries", 3), ("timeout", 30)]);
        assert_eq!(Map(&map).to_string(), "{retries: 3, timeout: 30}");
        assert_eq!(Pair("user", "root").to_string(), "user: root");

        let big: BTreeMap<u32, u32> = (0..101).map(|i| (i, i * 2)).collect();
        assert!(Map(&big).to_string().ends_with("99: 198 ...}"));
    }

    #[test]
    fn test_tuples() {
        assert_eq!(Tuple(&(1,)).to_string(), "(1)");
        assert_eq!(Tuple(&("a", 2, 3.5)).to_string(), "(a, 2, 3.5)");
        assert_eq!(
            Tuple(&(1, 2, 3, 4, 5, "six")).to_string(),
            "(1, 2, 3, 4, 5, six)"
        );
        assert_eq!(
            format!("{}", Seq(&[Tuple(&(1, 'x')), Tuple(&(2, 'y'))])),
            "[(1, x), (2, y)]"
        );
    }
}
