//! Data types for notes and the upstream payloads that carry them.

use serde::{Deserialize, Serialize};

/// File suffix of every stored note.
pub const NOTE_SUFFIX: &str = ".json";

/// Whether `id` can name a note file: one path segment of ASCII letters,
/// digits, `-`, `_` or `.`, not starting with a dot.
///
/// Route parameters arrive percent-decoded, so anything else could steer
/// the upstream URL outside the notes directory.
pub fn is_valid_note_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// A stored note as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn from_body(id: impl Into<String>, body: NoteBody) -> Self {
        Self {
            id: id.into(),
            title: body.title,
            content: body.content,
        }
    }
}

/// The on-disk shape of a note file. The id lives only in the filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBody {
    pub title: String,
    pub content: String,
}

/// One entry of a GitHub contents-API response, either from a directory
/// listing or a single-file lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamFile {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Base64 file body; only present on single-file lookups.
    #[serde(default)]
    pub content: Option<String>,
}

impl UpstreamFile {
    /// The note id encoded in this entry's name, if it is a note file.
    pub fn note_id(&self) -> Option<&str> {
        if self.kind != "file" {
            return None;
        }
        self.name
            .strip_suffix(NOTE_SUFFIX)
            .filter(|id| !id.is_empty())
    }
}

/// Request body accepted by `POST /notes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CreateNote {
    /// Returns both fields when present and non-empty.
    pub fn required_fields(&self) -> Option<(&str, &str)> {
        let title = self.title.as_deref().filter(|t| !t.is_empty())?;
        let content = self.content.as_deref().filter(|c| !c.is_empty())?;
        Some((title, content))
    }
}
