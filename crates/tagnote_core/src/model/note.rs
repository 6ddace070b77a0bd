//! Note, tag and request payload types.
//!
//! # Responsibility
//! - Mirror the JSON shapes of the notes service (`Note`, create/update bodies).
//! - Own tag normalization helpers shared by store and editor session.
//!
//! # Invariants
//! - `content` is an opaque serialized rich-text fragment; nothing here
//!   interprets it beyond the plain-text preview.
//! - `NoteUpdate` omits absent fields from the wire body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Title used whenever a note has no title of its own.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled note";

const PREVIEW_MAX_CHARS: usize = 80;

static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid markup tag regex"));

/// Opaque server-assigned note identifier.
///
/// Some deployments hand out integer ids, others strings; both are accepted
/// on the wire and held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawNoteId", into = "String")]
pub struct NoteId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNoteId {
    Text(String),
    Integer(i64),
    Unsigned(u64),
}

impl From<RawNoteId> for NoteId {
    fn from(value: RawNoteId) -> Self {
        match value {
            RawNoteId::Text(text) => Self(text),
            RawNoteId::Integer(number) => Self(number.to_string()),
            RawNoteId::Unsigned(number) => Self(number.to_string()),
        }
    }
}

impl From<NoteId> for String {
    fn from(value: NoteId) -> Self {
        value.0
    }
}

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Note as returned by the notes service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned id, immutable once created.
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    /// Serialized rich-text fragment.
    #[serde(default)]
    pub content: String,
    /// Ordered, duplicate-free labels.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    /// Returns the title shown in lists and headers.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_NOTE_TITLE
        } else {
            self.title.as_str()
        }
    }

    /// Returns the list-row preview: markup removed, first 80 characters.
    pub fn preview(&self) -> String {
        let stripped = strip_markup(&self.content);
        stripped.chars().take(PREVIEW_MAX_CHARS).collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }
}

/// Create-note request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NewNote {
    /// Builds the default payload for a fresh note.
    ///
    /// The active tag filter (if any) becomes the only tag, so the new note
    /// stays visible under the current filter.
    pub fn untitled(active_tag: &str) -> Self {
        let tags = if active_tag.is_empty() {
            Vec::new()
        } else {
            vec![active_tag.to_string()]
        };
        Self {
            title: UNTITLED_NOTE_TITLE.to_string(),
            content: String::new(),
            tags,
        }
    }
}

/// Partial update request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    /// Full replacement of every editable field.
    pub fn full(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            tags: Some(tags),
        }
    }
}

/// List filter. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Free-text substring filter, sent as `q`.
    pub query: String,
    /// Exact tag filter, sent as `tag`.
    pub tag: String,
}

impl NoteFilter {
    pub fn new(query: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tag: tag.into(),
        }
    }

    /// Returns the query pairs that should go on the wire.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if !self.query.is_empty() {
            pairs.push(("q", self.query.as_str()));
        }
        if !self.tag.is_empty() {
            pairs.push(("tag", self.tag.as_str()));
        }
        pairs
    }
}

/// Normalizes one tag value typed by a user.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Removes duplicate tags, keeping the first occurrence of each.
pub fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Removes every markup tag from a serialized fragment.
pub fn strip_markup(fragment: &str) -> String {
    MARKUP_TAG_RE.replace_all(fragment, "").into_owned()
}
