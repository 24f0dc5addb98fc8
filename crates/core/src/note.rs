//! Notes and their storage strategy trait.
//!
//! A [`Note`] is a line of free text with a completion flag. Like health
//! records, notes live in whichever [`NoteStore`] serviced the call that
//! created them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::StoreBackend;
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "note_id")]
    pub id: String,

    pub content: String,

    #[serde(rename = "iscompleted", default, deserialize_with = "false_if_null")]
    pub is_completed: bool,

    pub created_at: DateTime<Utc>,
}

fn false_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// The fields needed to create a note.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub content: String,
    pub is_completed: bool,
}

impl NewNote {
    pub fn new(content: &str, is_completed: bool) -> Self {
        Self {
            content: content.trim().to_string(),
            is_completed,
        }
    }

    pub fn into_note(self, id: String) -> Note {
        Note {
            id,
            content: self.content,
            is_completed: self.is_completed,
            created_at: Utc::now(),
        }
    }
}

/// A partial note update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(
        rename = "iscompleted",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_completed: Option<bool>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.is_completed.is_none()
    }

    pub fn apply_to(&self, note: &mut Note) {
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(done) = self.is_completed {
            note.is_completed = done;
        }
    }
}

/// The storage strategy for notes.
#[async_trait]
pub trait NoteStore: StoreBackend {
    /// Store a new note and return its generated id.
    async fn add_note(&self, note: NewNote) -> Result<String, StoreError>;

    /// Apply a partial update. `Ok(None)` when the id is unknown.
    async fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Option<Note>, StoreError>;

    /// Every note, oldest first.
    async fn notes(&self) -> Result<Vec<Note>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_uses_remote_field_names() {
        let note = NewNote::new("  buy milk ", false).into_note("n1".into());
        assert_eq!(note.content, "buy milk");

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["note_id"], "n1");
        assert_eq!(json["iscompleted"], false);
        assert!(json.get("is_completed").is_none());
    }

    #[test]
    fn update_applies_only_supplied_fields() {
        let mut note = NewNote::new("draft", false).into_note("n1".into());
        let update = NoteUpdate {
            is_completed: Some(true),
            ..NoteUpdate::default()
        };
        update.apply_to(&mut note);
        assert_eq!(note.content, "draft");
        assert!(note.is_completed);
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        assert!(NoteUpdate::default().is_empty());
        let json = serde_json::to_value(NoteUpdate::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let json = serde_json::to_value(NoteUpdate {
            is_completed: Some(false),
            ..NoteUpdate::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"iscompleted": false}));
    }
}
