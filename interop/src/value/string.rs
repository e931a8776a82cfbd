//! Script string values and their three representations
//!
//! A string value carries exactly one representation at a time:
//! - `Legacy`: single-byte strings from pre-unicode scripts, one byte per
//!   character
//! - `Binary`: byte-oriented data with no character interpretation
//! - `Text`: code-point-oriented unicode text
//!
//! Conversions are one-directional in how they can lose information:
//! binary to text may fail on invalid sequences, text to binary always
//! succeeds by re-encoding, and legacy bytes map 1:1 onto code points.

use std::fmt;

/// Which representation a string value carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringRepr {
    Legacy,
    Binary,
    Text,
}

/// A script string in one of the three representations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DynString {
    /// Single-byte legacy string
    Legacy(Vec<u8>),
    /// Byte-oriented binary string
    Binary(Vec<u8>),
    /// Code-point-oriented text string
    Text(String),
}

impl DynString {
    /// Build a text string
    pub fn text(s: impl Into<String>) -> Self {
        DynString::Text(s.into())
    }

    /// Build a binary string
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        DynString::Binary(bytes.into())
    }

    /// Build a legacy single-byte string
    pub fn legacy(bytes: impl Into<Vec<u8>>) -> Self {
        DynString::Legacy(bytes.into())
    }

    pub fn repr(&self) -> StringRepr {
        match self {
            DynString::Legacy(_) => StringRepr::Legacy,
            DynString::Binary(_) => StringRepr::Binary,
            DynString::Text(_) => StringRepr::Text,
        }
    }

    /// Character length: bytes for legacy/binary, code points for text
    pub fn char_len(&self) -> usize {
        match self {
            DynString::Legacy(b) | DynString::Binary(b) => b.len(),
            DynString::Text(s) => s.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DynString::Legacy(b) | DynString::Binary(b) => b.is_empty(),
            DynString::Text(s) => s.is_empty(),
        }
    }

    /// Single character, when the string has character length exactly 1
    pub fn single_char(&self) -> Option<char> {
        match self {
            DynString::Legacy(b) => match b.as_slice() {
                [byte] => Some(*byte as char),
                _ => None,
            },
            DynString::Binary(b) => {
                // A one-byte binary string decodes as its byte value; longer
                // sequences must form exactly one valid code point
                match b.as_slice() {
                    [byte] => Some(*byte as char),
                    _ => {
                        let s = std::str::from_utf8(b).ok()?;
                        let mut chars = s.chars();
                        let c = chars.next()?;
                        chars.next().is_none().then_some(c)
                    }
                }
            }
            DynString::Text(s) => {
                let mut chars = s.chars();
                let c = chars.next()?;
                chars.next().is_none().then_some(c)
            }
        }
    }

    /// Decode to text. Fails only for binary data that is not valid UTF-8;
    /// legacy bytes always decode (byte value = code point).
    pub fn to_text(&self) -> Result<String, std::str::Utf8Error> {
        match self {
            DynString::Legacy(b) => Ok(b.iter().map(|&byte| byte as char).collect()),
            DynString::Binary(b) => std::str::from_utf8(b).map(str::to_owned),
            DynString::Text(s) => Ok(s.clone()),
        }
    }

    /// Decode to text, replacing invalid binary sequences with U+FFFD.
    /// Returns whether any replacement happened.
    pub fn to_text_lossy(&self) -> (String, bool) {
        match self {
            DynString::Binary(b) => match String::from_utf8_lossy(b) {
                std::borrow::Cow::Borrowed(s) => (s.to_owned(), false),
                std::borrow::Cow::Owned(s) => (s, true),
            },
            other => (other.to_text().expect("legacy/text decode is total"), false),
        }
    }

    /// Re-encode to bytes; always succeeds for every representation
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            DynString::Legacy(b) | DynString::Binary(b) => b.clone(),
            DynString::Text(s) => s.as_bytes().to_vec(),
        }
    }

    /// Parse as an integer, for numeric-string detection
    pub fn parse_long(&self) -> Option<i64> {
        self.to_text_lossy().0.trim().parse().ok()
    }

    /// Parse as a float, for numeric-string detection
    pub fn parse_float(&self) -> Option<f64> {
        self.to_text_lossy().0.trim().parse().ok()
    }

    /// True when the string parses as a number
    pub fn is_numeric(&self) -> bool {
        self.parse_float().is_some()
    }
}

impl fmt::Display for DynString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text_lossy().0)
    }
}

impl From<&str> for DynString {
    fn from(s: &str) -> Self {
        DynString::Text(s.to_owned())
    }
}

impl From<String> for DynString {
    fn from(s: String) -> Self {
        DynString::Text(s)
    }
}
