//! Response path addressing
//!
//! A [`ResponsePath`] records where a resolved field lives inside the response
//! tree. Plugins address that location through a pointer string built by
//! [`construct_pointer`]: `/` followed by the segments joined with `/`.
//!
//! ```rust
//! use this_plugins::core::path::{PathSegment, construct_pointer};
//!
//! let segments = vec![
//!     PathSegment::from("users"),
//!     PathSegment::from(0usize),
//!     PathSegment::from("ssn"),
//! ];
//! assert_eq!(construct_pointer(&segments), "/users/0/ssn");
//! assert_eq!(construct_pointer(&[]), "/");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One step of a response path: a field (response key) or a list index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Response key of a field (the alias when one is used)
    Field(String),
    /// Position inside a list value
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered path from the response root to a field
///
/// Serializes as a JSON array of strings and integers, which is the shape
/// GraphQL uses for the `path` of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsePath(Vec<PathSegment>);

impl ResponsePath {
    /// The empty path (the response root)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of a field nested under this one
    pub fn child_field(&self, response_key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(response_key.into()));
        Self(segments)
    }

    /// Path of a list item nested under this one
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, if it is a field
    pub fn last_field(&self) -> Option<&str> {
        match self.0.last() {
            Some(PathSegment::Field(name)) => Some(name),
            _ => None,
        }
    }

    /// Pointer string for this path, see [`construct_pointer`]
    pub fn to_pointer(&self) -> String {
        construct_pointer(&self.0)
    }
}

impl From<Vec<PathSegment>> for ResponsePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<PathSegment> for ResponsePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

/// Build the pointer string for a sequence of path segments
///
/// The result always starts with `/` and has no trailing separator. Field
/// names are written as-is (GraphQL names cannot contain `/` or `~`), indices
/// in decimal. An empty sequence yields `/`.
pub fn construct_pointer(segments: &[PathSegment]) -> String {
    let mut pointer = String::from("/");
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            pointer.push('/');
        }
        pointer.push_str(&segment.to_string());
    }
    pointer
}

/// Translate one of our pointers into the RFC 6901 form `serde_json` expects
///
/// The only difference is the root: we write `/`, RFC 6901 writes the empty
/// string (where `/` would mean "the key named empty string").
fn to_json_pointer(pointer: &str) -> &str {
    if pointer == "/" { "" } else { pointer }
}

/// Look up the value addressed by `pointer` inside `data`
pub fn locate<'a>(data: &'a Value, pointer: &str) -> Option<&'a Value> {
    data.pointer(to_json_pointer(pointer))
}

/// Mutable variant of [`locate`]
pub fn locate_mut<'a>(data: &'a mut Value, pointer: &str) -> Option<&'a mut Value> {
    data.pointer_mut(to_json_pointer(pointer))
}
