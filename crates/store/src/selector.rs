//! Per-call backend selection.
//!
//! Every operation asks the selector for a store first. The remote store
//! wins whenever it reports itself available; otherwise the local store
//! serves the call. The decision is never cached.

use chrono::Utc;
use concierge_core::backend::StoreBackend;
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::health::HealthStore;
use concierge_core::note::NoteStore;
use std::sync::Arc;
use tracing::debug;

/// Chooses between an optional remote backend and a local one.
pub struct StoreSelector<S: ?Sized + StoreBackend> {
    remote: Option<Arc<S>>,
    local: Arc<S>,
    events: Option<Arc<EventBus>>,
}

/// Selects the store for goals and food logs.
pub type BackendSelector = StoreSelector<dyn HealthStore>;

/// Selects the store for notes.
pub type NoteSelector = StoreSelector<dyn NoteStore>;

impl<S: ?Sized + StoreBackend> Clone for StoreSelector<S> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            local: Arc::clone(&self.local),
            events: self.events.clone(),
        }
    }
}

impl<S: ?Sized + StoreBackend> StoreSelector<S> {
    pub fn new(remote: Option<Arc<S>>, local: Arc<S>) -> Self {
        Self {
            remote,
            local,
            events: None,
        }
    }

    /// A selector that only ever uses `local`.
    pub fn local_only(local: Arc<S>) -> Self {
        Self::new(None, local)
    }

    /// Publish a [`DomainEvent::BackendSelected`] for every selection.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Check the remote store and pick the backend for one call.
    pub async fn select(&self) -> Arc<S> {
        let chosen = match &self.remote {
            Some(remote) if remote.is_available().await => Arc::clone(remote),
            _ => Arc::clone(&self.local),
        };

        debug!(backend = %chosen.kind(), store = chosen.name(), "Selected store");
        if let Some(events) = &self.events {
            events.publish(DomainEvent::BackendSelected {
                backend: chosen.kind(),
                name: chosen.name().to_string(),
                timestamp: Utc::now(),
            });
        }
        chosen
    }
}
