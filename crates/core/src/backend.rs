//! What every storage backend reports about itself.
//!
//! [`HealthStore`](crate::health::HealthStore) and
//! [`NoteStore`](crate::note::NoteStore) both extend [`StoreBackend`], so
//! one selector type can choose between a remote and a local backend for
//! either record family.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which kind of backend serviced a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Remote,
    Local,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Remote => write!(f, "remote"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}

#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// The backend name (e.g., "supabase", "in_memory").
    fn name(&self) -> &str;

    fn kind(&self) -> BackendKind;

    /// Can this backend service calls right now?
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_displays_lowercase() {
        assert_eq!(BackendKind::Remote.to_string(), "remote");
        assert_eq!(BackendKind::Local.to_string(), "local");
    }
}
