//! The `health_diet` agent: goals and food logging through the health tools.

use async_trait::async_trait;
use concierge_config::AppConfig;
use concierge_core::agent::Agent;
use concierge_core::event::EventBus;
use concierge_core::message::{Conversation, Message};
use concierge_core::provider::Provider;
use concierge_tools::HealthService;
use std::sync::Arc;
use tracing::info;

use crate::loop_runner::AgentLoop;
use crate::prompts::{self, HealthIntent};

pub const HEALTH_DIET: &str = "health_diet";

pub struct HealthDietAgent {
    agent_loop: AgentLoop,
}

impl HealthDietAgent {
    pub fn new(agent_loop: AgentLoop) -> Self {
        Self { agent_loop }
    }

    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        service: Arc<HealthService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let agent_loop = AgentLoop::new(
            provider,
            &config.default_model,
            config.default_temperature,
            Arc::new(concierge_tools::health_registry(service)),
            prompts::health_system_prompt(),
            event_bus,
        )
        .with_max_tokens(config.default_max_tokens)
        .with_max_iterations(config.max_tool_iterations);
        Self::new(agent_loop)
    }
}

#[async_trait]
impl Agent for HealthDietAgent {
    fn name(&self) -> &str {
        HEALTH_DIET
    }

    fn description(&self) -> &str {
        prompts::HEALTH_DIET_DESCRIPTION
    }

    async fn run(&self, input: &str) -> concierge_core::Result<String> {
        info!(agent = HEALTH_DIET, intent = ?HealthIntent::classify(input), "Handling query");
        let mut conversation = Conversation::new();
        conversation.push(Message::user(prompts::health_task(input)));
        self.agent_loop.process(&mut conversation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_text_response, make_tool_call_response, SequentialMockProvider};
    use concierge_store::{BackendSelector, LocalStore};

    fn agent_with_store(provider: Arc<SequentialMockProvider>) -> (HealthDietAgent, LocalStore) {
        let store = LocalStore::new();
        let selector = BackendSelector::local_only(Arc::new(store.clone()));
        let service = Arc::new(HealthService::new(selector));
        let agent = HealthDietAgent::from_config(
            &AppConfig::default(),
            provider,
            service,
            Arc::new(EventBus::default()),
        );
        (agent, store)
    }

    #[tokio::test]
    async fn logs_food_through_the_tool() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response(
                "call_0",
                "add_food_log",
                r#"{"meal_type":"breakfast","food_item":"oatmeal","calories":150}"#,
            ),
            make_text_response("✅ Food log completed successfully. Oatmeal, 150 calories."),
        ]));
        let (agent, store) = agent_with_store(provider.clone());

        let reply = agent.run("I ate oatmeal for breakfast, 150 calories").await.unwrap();
        assert!(reply.starts_with("✅"));
        assert_eq!(store.food_log_count().await, 1);

        let first = &provider.requests()[0];
        assert_eq!(first.tools.len(), 5);
        assert!(first.messages[1].content.contains("add_food_log"));

        let requests = provider.requests();
        let tool_output = &requests[1].messages.last().unwrap().content;
        assert!(tool_output.contains("(Local Storage)"));
        assert!(tool_output.contains("oatmeal"));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let (agent, _store) = agent_with_store(provider);
        assert!(agent.run("show my goals").await.is_err());
    }

    #[test]
    fn manifest_uses_acp_name() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let (agent, _store) = agent_with_store(provider);
        assert_eq!(agent.manifest().name, "health_diet");
    }
}
