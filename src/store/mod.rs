//! Storage abstraction for notes.
//!
//! The [`NoteStore`] trait is the seam between the HTTP router and whatever
//! actually keeps the notes. Production uses
//! [`GitHubStore`](crate::github::GitHubStore); tests and offline runs use
//! [`memory::InMemoryNoteStore`].
//!
//! Notes are write-once: there is no update or delete.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteBody};

/// Abstract note storage.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list`](NoteStore::list) | Every stored note, in backend order |
/// | [`get`](NoteStore::get) | One note by id, `None` when absent |
/// | [`put`](NoteStore::put) | Store a new note under `id` |
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Returns every stored note. Order is whatever the backend yields and
    /// must not be relied on.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Looks up a note. A missing note is `Ok(None)`, not an error.
    async fn get(&self, id: &str) -> Result<Option<NoteBody>>;

    /// Stores a note under `id`.
    async fn put(&self, id: &str, title: &str, content: &str) -> Result<()>;
}
