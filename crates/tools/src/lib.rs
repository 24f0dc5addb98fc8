//! Tool implementations for Concierge.
//!
//! Three tool families:
//! - health tools (goals and food log) over [`HealthService`]
//! - note tools over [`NoteService`]
//! - sub-agent query tools that forward to the meeting and expense agents
//!   over ACP and to the in-process notes agent

pub mod acp_client;
pub mod health;
pub mod health_tools;
pub mod notes;
pub mod notes_tools;
pub mod report;
pub mod sub_agent;

use concierge_config::{AgentsConfig, StoreConfig};
use concierge_core::agent::Agent;
use concierge_core::error::{AgentError, StoreError};
use concierge_core::event::EventBus;
use concierge_core::health::HealthStore;
use concierge_core::note::NoteStore;
use concierge_core::tool::ToolRegistry;
use concierge_store::{BackendSelector, LocalStore, NoteSelector, SupabaseStore};
use std::sync::Arc;

pub use acp_client::AcpClient;
pub use health::HealthService;
pub use notes::NoteService;
pub use sub_agent::SubAgentTool;

/// Service over the remote store (when configured) with a fresh in-memory fallback.
pub fn health_service(config: &StoreConfig, events: Arc<EventBus>) -> Result<HealthService, StoreError> {
    let remote = SupabaseStore::from_config(config)?.map(|store| Arc::new(store) as Arc<dyn HealthStore>);
    let selector = BackendSelector::new(remote, Arc::new(LocalStore::new())).with_events(events.clone());
    Ok(HealthService::new(selector).with_events(events))
}

/// Notes over the same remote store, with their own in-memory fallback.
pub fn note_service(config: &StoreConfig, events: Arc<EventBus>) -> Result<NoteService, StoreError> {
    let remote = SupabaseStore::from_config(config)?.map(|store| Arc::new(store) as Arc<dyn NoteStore>);
    let selector = NoteSelector::new(remote, Arc::new(LocalStore::new())).with_events(events.clone());
    Ok(NoteService::new(selector).with_events(events))
}

/// Registry with the five health tools sharing one service.
pub fn health_registry(service: Arc<HealthService>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(health_tools::AddHealthGoalTool::new(service.clone())));
    registry.register(Box::new(health_tools::UpdateHealthGoalTool::new(service.clone())));
    registry.register(Box::new(health_tools::GetHealthGoalsTool::new(service.clone())));
    registry.register(Box::new(health_tools::AddFoodLogTool::new(service.clone())));
    registry.register(Box::new(health_tools::GetFoodLogTool::new(service)));
    registry
}

/// Registry with the three note tools sharing one service.
pub fn notes_registry(service: Arc<NoteService>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(notes_tools::ListNotesTool::new(service.clone())));
    registry.register(Box::new(notes_tools::AddNoteTool::new(service.clone())));
    registry.register(Box::new(notes_tools::UpdateNoteTool::new(service)));
    registry
}

/// Registry with the three sub-agent query tools; `notes` answers in process.
pub fn orchestrator_registry(
    agents: &AgentsConfig,
    notes: Arc<dyn Agent>,
) -> Result<ToolRegistry, AgentError> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SubAgentTool::meeting(&agents.meeting)?));
    registry.register(Box::new(SubAgentTool::expense(&agents.expense)?));
    registry.register(Box::new(SubAgentTool::notes(notes)));
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_registry_has_five_tools() {
        let selector = BackendSelector::local_only(Arc::new(LocalStore::new()));
        let registry = health_registry(Arc::new(HealthService::new(selector)));
        assert_eq!(
            registry.names(),
            vec![
                "add_food_log",
                "add_health_goal",
                "get_food_log",
                "get_health_goals",
                "update_health_goal"
            ]
        );
    }

    #[test]
    fn health_service_without_remote_is_local_only() {
        let service = health_service(&StoreConfig::default(), Arc::new(EventBus::default())).unwrap();
        assert!(!service.has_remote());
    }

    #[test]
    fn notes_registry_has_three_tools() {
        let selector = NoteSelector::local_only(Arc::new(LocalStore::new()));
        let registry = notes_registry(Arc::new(NoteService::new(selector)));
        assert_eq!(registry.names(), vec!["add_note", "list_notes", "update_note"]);
    }

    #[test]
    fn note_service_without_remote_is_local_only() {
        let service = note_service(&StoreConfig::default(), Arc::new(EventBus::default())).unwrap();
        assert!(!service.has_remote());
    }

    struct Silent;

    #[async_trait::async_trait]
    impl Agent for Silent {
        fn name(&self) -> &str {
            "notes"
        }

        fn description(&self) -> &str {
            "Says nothing"
        }

        async fn run(&self, _input: &str) -> concierge_core::Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn orchestrator_registry_has_three_agents() {
        let registry = orchestrator_registry(&AgentsConfig::default(), Arc::new(Silent)).unwrap();
        assert_eq!(
            registry.names(),
            vec!["query_expense_agent", "query_meeting_agent", "query_notes_agent"]
        );
    }
}
