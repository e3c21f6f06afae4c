//! In-memory [`NoteStore`] for tests and offline runs.
//!
//! Uses a `Vec` behind `std::sync::RwLock`; listing returns notes in
//! insertion order.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteBody};

use super::NoteStore;

/// In-memory note store.
pub struct InMemoryNoteStore {
    notes: RwLock<Vec<Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored notes.
    pub fn len(&self) -> usize {
        self.notes.read().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn list(&self) -> Result<Vec<Note>> {
        let notes = self.notes.read().unwrap_or_else(|e| e.into_inner());
        Ok(notes.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<NoteBody>> {
        let notes = self.notes.read().unwrap_or_else(|e| e.into_inner());
        Ok(notes.iter().find(|n| n.id == id).map(|n| NoteBody {
            title: n.title.clone(),
            content: n.content.clone(),
        }))
    }

    async fn put(&self, id: &str, title: &str, content: &str) -> Result<()> {
        let mut notes = self.notes.write().unwrap_or_else(|e| e.into_inner());
        let note = Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        };
        // Same id overwrites the file upstream, so replace in place.
        match notes.iter_mut().find(|n| n.id == id) {
            Some(existing) => *existing = note,
            None => notes.push(note),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryNoteStore::new();
        store.put("a", "Title", "Body").await.unwrap();

        let body = store.get("a").await.unwrap().unwrap();
        assert_eq!(body.title, "Title");
        assert_eq!(body.content, "Body");
        assert!(store.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let store = InMemoryNoteStore::new();
        store.put("1", "one", "1").await.unwrap();
        store.put("2", "two", "2").await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(store.len(), 2);
    }
}
