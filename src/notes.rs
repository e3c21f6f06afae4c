//! Note operations shared by the HTTP server and the CLI.
//!
//! [`NoteService`] pairs a [`NoteStore`] with a [`ContentFilter`]. Creation
//! filters the title and the content before anything is written; a filter
//! failure aborts creation with nothing stored.

use std::sync::Arc;

use anyhow::bail;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{NoteError, Result};
use crate::filter::{create_filter, ContentFilter};
use crate::github::GitHubStore;
use crate::models::{is_valid_note_id, Note, NoteBody};
use crate::store::memory::InMemoryNoteStore;
use crate::store::NoteStore;

/// Note operations over a store and a filter.
///
/// Cheap to clone; both halves are shared behind `Arc`.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    filter: Arc<dyn ContentFilter>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>, filter: Arc<dyn ContentFilter>) -> Self {
        Self { store, filter }
    }

    /// Builds the service described by `config`.
    ///
    /// `repository.backend` picks the store: `github` (default) or `memory`.
    /// The filter comes from [`create_filter`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn NoteStore> = match config.repository.backend.as_str() {
            "memory" => Arc::new(InMemoryNoteStore::new()),
            "github" => Arc::new(GitHubStore::new(config.repository.clone())?),
            other => {
                return Err(NoteError::Config(format!(
                    "unknown repository backend: {}",
                    other
                )))
            }
        };
        let filter = create_filter(&config.filter)?;
        Ok(Self::new(store, filter))
    }

    pub async fn list(&self) -> Result<Vec<Note>> {
        self.store.list().await
    }

    /// Looks up a note. Ids that cannot name a note file are reported as
    /// absent without touching the store.
    pub async fn get(&self, id: &str) -> Result<Option<NoteBody>> {
        if !is_valid_note_id(id) {
            tracing::debug!(note_id = %id, "rejecting malformed note id");
            return Ok(None);
        }
        self.store.get(id).await
    }

    /// Filters both fields, assigns a fresh id, and stores the note.
    pub async fn create(&self, title: &str, content: &str) -> Result<Note> {
        let title = self.filter.filter(title).await?;
        let content = self.filter.filter(content).await?;

        let id = Uuid::new_v4().to_string();
        tracing::info!(note_id = %id, "storing note");
        self.store.put(&id, &title, &content).await?;

        Ok(Note { id, title, content })
    }
}

/// CLI entry point for `list`.
pub async fn run_list(config: &Config) -> anyhow::Result<()> {
    let service = NoteService::from_config(config)?;
    let notes = service.list().await?;

    if notes.is_empty() {
        println!("No notes.");
        return Ok(());
    }
    for note in &notes {
        println!("{}  {}", note.id, note.title);
    }
    println!("\n{} note(s)", notes.len());
    Ok(())
}

/// CLI entry point for `get`.
pub async fn run_get(config: &Config, id: &str) -> anyhow::Result<()> {
    let service = NoteService::from_config(config)?;
    let Some(note) = service.get(id).await? else {
        bail!("note not found: {}", id);
    };

    println!("--- {} ---", id);
    println!("title: {}", note.title);
    println!();
    println!("{}", note.content);
    Ok(())
}

/// CLI entry point for `add`.
pub async fn run_add(config: &Config, title: &str, content: &str) -> anyhow::Result<()> {
    if title.is_empty() || content.is_empty() {
        bail!("Title and Content are required.");
    }
    let service = NoteService::from_config(config)?;
    let note = service.create(title, content).await?;
    println!("{}", note.id);
    Ok(())
}
