//! Note operations over the selected backend.

use chrono::Utc;
use concierge_core::backend::{BackendKind, StoreBackend};
use concierge_core::error::StoreError;
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::note::{NewNote, Note, NoteStore, NoteUpdate};
use concierge_store::NoteSelector;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteAdded {
    pub backend: BackendKind,
    pub note_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteList {
    pub backend: BackendKind,
    pub notes: Vec<Note>,
}

pub struct NoteService {
    selector: NoteSelector,
    events: Option<Arc<EventBus>>,
}

impl NoteService {
    pub fn new(selector: NoteSelector) -> Self {
        Self {
            selector,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.selector.has_remote()
    }

    pub async fn add_note(&self, content: &str, is_completed: bool) -> Result<NoteAdded, StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::InvalidInput("content must not be empty".into()));
        }
        let store = self.selector.select().await;
        let note_id = store.add_note(NewNote::new(content, is_completed)).await?;
        self.note_saved(&note_id, store.kind());
        Ok(NoteAdded {
            backend: store.kind(),
            note_id,
        })
    }

    /// Apply the supplied fields. `InvalidInput` when nothing is supplied,
    /// `NotFound` when the id is unknown.
    pub async fn update_note(&self, note_id: &str, update: NoteUpdate) -> Result<Note, StoreError> {
        if update.is_empty() {
            return Err(StoreError::InvalidInput(
                "No updates provided. Specify content or is_completed.".into(),
            ));
        }
        let store = self.selector.select().await;
        match store.update_note(note_id, update).await? {
            Some(note) => {
                self.note_saved(&note.id, store.kind());
                Ok(note)
            }
            None => Err(StoreError::NotFound(note_id.to_string())),
        }
    }

    pub async fn list_notes(&self) -> Result<NoteList, StoreError> {
        let store = self.selector.select().await;
        let notes = store.notes().await?;
        Ok(NoteList {
            backend: store.kind(),
            notes,
        })
    }

    fn note_saved(&self, note_id: &str, backend: BackendKind) {
        if let Some(events) = &self.events {
            events.publish(DomainEvent::NoteSaved {
                note_id: note_id.to_string(),
                backend,
                timestamp: Utc::now(),
            });
        }
    }
}
