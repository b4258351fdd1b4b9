//! `application/x-www-form-urlencoded` parsing.
//!
//! Query strings and url-encoded form bodies share one format, so both
//! [`Context::query`](crate::Context::query) and
//! [`Context::post_form`](crate::Context::post_form) go through
//! [`UrlEncoded`]. Keys and values are percent-decoded on access and `+`
//! decodes to a space.
//!
//! # Example
//!
//! ```
//! use gweb_core::UrlEncoded;
//!
//! let qs = UrlEncoded::parse("a=1&b=2&a=3");
//! assert_eq!(qs.get("a").as_deref(), Some("1"));
//! assert_eq!(qs.get_all("a"), vec!["1", "3"]);
//! ```

use std::borrow::Cow;

/// A borrowed url-encoded key/value list.
///
/// Parsing is lazy: the raw input is kept and split on each access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlEncoded<'a> {
    raw: &'a str,
}

impl<'a> UrlEncoded<'a> {
    /// Wrap a raw string (without a leading `?`).
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Returns the raw input.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Returns true if there is nothing to parse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw `(key, value)` pairs in input order. Keys without `=` get an
    /// empty value and empty segments (`a=1&&b=2`) are skipped.
    pub fn raw_pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.raw
            .split('&')
            .filter(|s| !s.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
    }

    /// Decoded `(key, value)` pairs in input order.
    pub fn pairs(&self) -> impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)> {
        self.raw_pairs()
            .map(|(k, v)| (percent_decode(k), percent_decode(v)))
    }

    /// First decoded value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'a, str>> {
        self.pairs().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Every decoded value for `key`, in input order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<Cow<'a, str>> {
        self.pairs()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }

    /// Check whether `key` is present, with or without a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs().any(|(k, _)| k == key)
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw_pairs().count()
    }
}

/// Percent-decode a string, treating `+` as a space.
///
/// Borrows when nothing needs decoding. Malformed escapes are kept as-is
/// and invalid UTF-8 is replaced lossily.
///
/// ```
/// use gweb_core::percent_decode;
///
/// assert_eq!(percent_decode("hello%20world"), "hello world");
/// assert_eq!(percent_decode("a+b"), "a b");
/// assert_eq!(percent_decode("%ZZ"), "%ZZ");
/// ```
#[must_use]
pub fn percent_decode(s: &str) -> Cow<'_, str> {
    if !s.contains(['%', '+']) {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    out.push((hi << 4) | lo);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
