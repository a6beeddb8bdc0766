use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bookmark.
///
/// Seed records use small sequential numbers while records created at runtime get an opaque
/// string. Both compare through their string form, so `Seq(2)` matches the path segment `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookmarkId {
    Seq(u64),
    Opaque(String),
}

impl BookmarkId {
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            BookmarkId::Seq(n) => n.to_string() == raw,
            BookmarkId::Opaque(s) => s == raw,
        }
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkId::Seq(n) => write!(f, "{}", n),
            BookmarkId::Opaque(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for BookmarkId {
    fn from(id: String) -> Self {
        BookmarkId::Opaque(id)
    }
}

impl From<u64> for BookmarkId {
    fn from(id: u64) -> Self {
        BookmarkId::Seq(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub title: String,
    pub content: String,
}

impl Bookmark {
    pub fn new(id: impl Into<BookmarkId>, title: &str, content: &str) -> Self {
        Bookmark {
            id: id.into(),
            title: title.to_owned(),
            content: content.to_owned(),
        }
    }
}
