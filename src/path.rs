//! Bracket paths: `$["users"][0]["name"]`.
//!
//! A [`JsonPath`] is a sequence of [`Segment`]s. Its `Display` form is the
//! canonical bracket string; [`JsonPath::decode`] reads it back leniently and
//! [`JsonPath::decode_strict`] rejects anything the encoder would not produce.

use crate::error::{PathErrorKind, PathParseError};
use crate::statics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single step into a JSON tree.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Array element: `[0]`
    Index(usize),
    /// Object member: `["key"]`
    Key(String),
}

impl Segment {
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Segment::Key(k.into())
    }

    #[inline]
    pub fn index(i: usize) -> Self {
        Segment::Index(i)
    }

    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Quotes inside keys are not escaped; such keys do not survive a decode.
            Segment::Key(k) => write!(f, "[\"{k}\"]"),
            Segment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Segment::Key(s)
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Segment::Key(s.to_owned())
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

/// The location of a node inside a document. The empty path is the root.
///
/// ```
/// use nodepath::JsonPath;
///
/// let path = JsonPath::root().key("users").index(0).key("name");
/// assert_eq!(path.to_string(), r#"$["users"][0]["name"]"#);
/// assert_eq!(JsonPath::decode(&path.to_string()), path);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(Vec<Segment>);

impl JsonPath {
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Append a key segment (builder).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Segment::Key(k.into()));
        self
    }

    /// Append an index segment (builder).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Segment::Index(i));
        self
    }

    #[inline]
    pub fn push(&mut self, seg: Segment) {
        self.0.push(seg);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// The path without its last segment; `None` at the root.
    pub fn parent(&self) -> Option<JsonPath> {
        let (_, init) = self.0.split_last()?;
        Some(JsonPath(init.to_vec()))
    }

    #[inline]
    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }

    /// Canonical bracket string, same as `to_string()`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Lenient decoding: collects every `["key"]` and `[digits]` token in
    /// order and skips whatever else is in between, including the leading `$`.
    /// Never fails.
    pub fn decode(text: &str) -> JsonPath {
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            match scan_token(text, pos) {
                Some((Token::Key(k), end)) => {
                    segments.push(Segment::Key(k.to_owned()));
                    pos = end;
                }
                Some((Token::Index(digits), end)) => {
                    match digits.parse::<usize>() {
                        Ok(i) => segments.push(Segment::Index(i)),
                        Err(_) => tracing::debug!(digits, "skipping oversized index in path"),
                    }
                    pos = end;
                }
                None => pos += 1,
            }
        }
        JsonPath(segments)
    }

    /// Decoding for text a user typed or pasted. Requires the leading `$`
    /// followed only by well-formed segments.
    pub fn decode_strict(text: &str) -> Result<JsonPath, PathParseError> {
        let Some(rest) = text.strip_prefix(statics::PATH_ROOT) else {
            return Err(PathParseError::new(0, PathErrorKind::MissingRoot));
        };
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut pos = text.len() - rest.len();
        while pos < bytes.len() {
            if bytes[pos] != b'[' {
                return Err(unexpected_at(text, pos));
            }
            match scan_token(text, pos) {
                Some((Token::Key(k), end)) => {
                    segments.push(Segment::Key(k.to_owned()));
                    pos = end;
                }
                Some((Token::Index(digits), end)) => {
                    let i = digits
                        .parse::<usize>()
                        .map_err(|_| PathParseError::new(pos + 1, PathErrorKind::IndexOverflow))?;
                    segments.push(Segment::Index(i));
                    pos = end;
                }
                None => return Err(diagnose(text, pos)),
            }
        }
        Ok(JsonPath(segments))
    }
}

enum Token<'a> {
    Key(&'a str),
    Index(&'a str),
}

/// Match one `["key"]` or `[digits]` token starting exactly at `pos`.
fn scan_token(text: &str, pos: usize) -> Option<(Token<'_>, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }
    let start = pos + 1;
    match bytes.get(start)? {
        b'"' => {
            let body = start + 1;
            let close = body + bytes[body..].iter().position(|b| *b == b'"')?;
            if close == body || bytes.get(close + 1) != Some(&b']') {
                return None;
            }
            Some((Token::Key(&text[body..close]), close + 2))
        }
        b'0'..=b'9' => {
            let len = bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();
            let close = start + len;
            if bytes.get(close) != Some(&b']') {
                return None;
            }
            Some((Token::Index(&text[start..close]), close + 1))
        }
        _ => None,
    }
}

fn unexpected_at(text: &str, pos: usize) -> PathParseError {
    match text[pos..].chars().next() {
        Some(c) => PathParseError::new(pos, PathErrorKind::UnexpectedCharacter(c)),
        None => PathParseError::new(pos, PathErrorKind::Unterminated),
    }
}

/// Explain why the token at `pos` (which starts with `[`) did not match.
fn diagnose(text: &str, pos: usize) -> PathParseError {
    let bytes = text.as_bytes();
    let start = pos + 1;
    match bytes.get(start) {
        None => PathParseError::new(start, PathErrorKind::Unterminated),
        Some(b'"') => {
            let body = start + 1;
            match bytes[body..].iter().position(|b| *b == b'"') {
                None => PathParseError::new(text.len(), PathErrorKind::Unterminated),
                Some(0) => PathParseError::new(body, PathErrorKind::EmptyKey),
                Some(n) => unexpected_at(text, body + n + 1),
            }
        }
        Some(b'0'..=b'9') => {
            let len = bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();
            unexpected_at(text, start + len)
        }
        Some(_) => unexpected_at(text, start),
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(statics::PATH_ROOT)?;
        for seg in &self.0 {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::decode_strict(s)
    }
}

impl FromIterator<Segment> for JsonPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        JsonPath(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a JsonPath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for JsonPath {
    type Output = Segment;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Build a [`JsonPath`]: string literals become keys, integers become indices.
///
/// ```
/// use nodepath::path;
///
/// let p = path!("items", 0, "name");
/// assert_eq!(p.to_string(), r#"$["items"][0]["name"]"#);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::JsonPath::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::JsonPath::root();
        $(
            p.push($crate::Segment::from($seg));
        )+
        p
    }};
}
