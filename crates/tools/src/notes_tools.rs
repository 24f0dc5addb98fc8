//! The three note tools exposed to the notes agent.
//!
//! Failures follow the health tools: a failed [`ToolResult`] with an
//! `Error <doing X>: …` text.

use async_trait::async_trait;
use concierge_core::backend::BackendKind;
use concierge_core::error::{StoreError, ToolError};
use concierge_core::note::NoteUpdate;
use concierge_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use std::sync::Arc;

use crate::health_tools::{parse_args, store_failure};
use crate::notes::NoteService;

pub const NO_UPDATES: &str = "No updates provided. Specify content or is_completed.";

// --- list_notes ---

pub struct ListNotesTool {
    service: Arc<NoteService>,
}

impl ListNotesTool {
    pub fn new(service: Arc<NoteService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ListNotesTool {
    fn name(&self) -> &str {
        "list_notes"
    }

    fn description(&self) -> &str {
        "List every stored note as JSON (note_id, content, iscompleted, created_at)"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(match self.service.list_notes().await {
            Ok(list) => {
                let text = serde_json::to_string_pretty(&list.notes).map_err(|e| {
                    ToolError::ExecutionFailed {
                        tool_name: self.name().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                ToolResult::text(text).with_data(serde_json::json!({
                    "backend": list.backend,
                    "count": list.notes.len(),
                }))
            }
            Err(e) => store_failure("listing notes", &e),
        })
    }
}

// --- add_note ---

#[derive(Debug, Deserialize)]
struct AddNoteArgs {
    content: String,
    #[serde(default)]
    is_completed: bool,
}

pub struct AddNoteTool {
    service: Arc<NoteService>,
}

impl AddNoteTool {
    pub fn new(service: Arc<NoteService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for AddNoteTool {
    fn name(&self) -> &str {
        "add_note"
    }

    fn description(&self) -> &str {
        "Add a new note to your notes database"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The note text"
                },
                "is_completed": {
                    "type": "boolean",
                    "description": "Whether the note starts out completed (default false)"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AddNoteArgs = parse_args(arguments)?;
        Ok(match self.service.add_note(&args.content, args.is_completed).await {
            Ok(added) => {
                let mut text = format!("Note added with ID: {}", added.note_id);
                if added.backend == BackendKind::Local {
                    text.push_str(" (Local Storage)");
                }
                ToolResult::text(text).with_data(serde_json::json!({
                    "backend": added.backend,
                    "note_id": added.note_id,
                }))
            }
            Err(e) => store_failure("adding note", &e),
        })
    }
}

// --- update_note ---

#[derive(Debug, Deserialize)]
struct UpdateNoteArgs {
    note_id: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    is_completed: Option<bool>,
}

pub struct UpdateNoteTool {
    service: Arc<NoteService>,
}

impl UpdateNoteTool {
    pub fn new(service: Arc<NoteService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for UpdateNoteTool {
    fn name(&self) -> &str {
        "update_note"
    }

    fn description(&self) -> &str {
        "Update a note's content or completion status"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "note_id": {
                    "type": "string",
                    "description": "Id of the note to change"
                },
                "content": {
                    "type": "string",
                    "description": "New note text"
                },
                "is_completed": {
                    "type": "boolean",
                    "description": "New completion status"
                }
            },
            "required": ["note_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: UpdateNoteArgs = parse_args(arguments)?;
        let update = NoteUpdate {
            content: args.content,
            is_completed: args.is_completed,
        };
        if update.is_empty() {
            return Ok(ToolResult::failure(NO_UPDATES));
        }

        Ok(match self.service.update_note(&args.note_id, update).await {
            Ok(note) => ToolResult::text(format!("Note {} updated successfully.", note.id))
                .with_data(serde_json::json!({"note_id": note.id, "iscompleted": note.is_completed})),
            Err(StoreError::NotFound(id)) => {
                ToolResult::failure(format!("Failed to update note {id}."))
            }
            Err(e) => store_failure("updating note", &e),
        })
    }
}
