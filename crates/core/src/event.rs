//! Domain event system: decoupled observation of what the assistant does.
//!
//! Events are published when a backend is chosen, a record is written, a
//! tool runs or the LLM answers. Subscribers (logging, tests) can react
//! without coupling to the publishers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::backend::BackendKind;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The selector picked a backend for one call
    BackendSelected {
        backend: BackendKind,
        name: String,
        timestamp: DateTime<Utc>,
    },

    /// A goal was created
    GoalRecorded {
        goal_id: String,
        goal_type: String,
        backend: BackendKind,
        timestamp: DateTime<Utc>,
    },

    /// A food entry was appended
    FoodLogged {
        food_id: String,
        calories: Option<i64>,
        backend: BackendKind,
        timestamp: DateTime<Utc>,
    },

    /// A note was created or updated
    NoteSaved {
        note_id: String,
        backend: BackendKind,
        timestamp: DateTime<Utc>,
    },

    /// The agent loop received a reply from the LLM
    ResponseGenerated {
        conversation_id: String,
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
