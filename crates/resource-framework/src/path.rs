//! # Field Paths
//!
//! A [`Path`] is a route into a nested structure: a sequence of field names,
//! sequence indices and map keys. Paths identify dropped fields in
//! [`MissingField`](crate::MissingField), declare [`FieldTraits`](crate::FieldTraits)
//! and label reference edges between resources.
//!
//! The rendering is the canonical form and can be parsed back:
//!
//! ```rust
//! use resource_framework::Path;
//!
//! let p = Path::root().field("Labels").key("env").field("Value");
//! assert_eq!(p.to_string(), r#".Labels["env"].Value"#);
//! assert_eq!(p.to_string().parse::<Path>().unwrap(), p);
//! ```

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// A named struct field.
    Field(String),
    /// A position in a sequence.
    Index(usize),
    /// A key in a map.
    Key(String),
}

/// An ordered route into a nested value. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn field(&self, name: impl Into<String>) -> Self {
        self.push(Segment::Field(name.into()))
    }

    pub fn index(&self, i: usize) -> Self {
        self.push(Segment::Index(i))
    }

    pub fn key(&self, k: impl Into<String>) -> Self {
        self.push(Segment::Key(k.into()))
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// The path without its last segment; `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn has_prefix(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Same path with every [`Segment::Index`] removed. Field traits are
    /// declared against this form so that one declaration covers every element
    /// of a sequence.
    pub fn without_indices(&self) -> Path {
        Self(
            self.0
                .iter()
                .filter(|s| !matches!(s, Segment::Index(_)))
                .cloned()
                .collect(),
        )
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Key(k) => {
                    let escaped = k.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[\"{escaped}\"]")?
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ResourceError::InvalidPath {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n == '.' || n == '[' {
                            break;
                        }
                        name.push(n);
                        chars.next();
                    }
                    if name.is_empty() {
                        return Err(invalid("empty field name"));
                    }
                    segments.push(Segment::Field(name));
                }
                '[' if chars.peek() == Some(&'"') => {
                    chars.next();
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('\\') => match chars.next() {
                                Some(e) => key.push(e),
                                None => return Err(invalid("dangling escape")),
                            },
                            Some('"') => break,
                            Some(k) => key.push(k),
                            None => return Err(invalid("unterminated key")),
                        }
                    }
                    if chars.next() != Some(']') {
                        return Err(invalid("expected ']' after key"));
                    }
                    segments.push(Segment::Key(key));
                }
                '[' => {
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => return Err(invalid("unterminated index")),
                        }
                    }
                    let i = digits.parse().map_err(|_| invalid("index is not a number"))?;
                    segments.push(Segment::Index(i));
                }
                _ => return Err(invalid("expected '.' or '['")),
            }
        }
        Ok(Self(segments))
    }
}
