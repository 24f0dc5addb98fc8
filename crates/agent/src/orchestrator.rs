//! The `personal_assistant` agent: routes a query to the meeting, expense
//! and notes agents and merges their replies.
//!
//! Meeting and expense agents are reached over ACP; the notes agent runs
//! in this process.

use async_trait::async_trait;
use concierge_config::AppConfig;
use concierge_core::agent::Agent;
use concierge_core::event::EventBus;
use concierge_core::message::{Conversation, Message};
use concierge_core::provider::Provider;
use std::sync::Arc;
use tracing::{info, warn};

use crate::loop_runner::AgentLoop;
use crate::notes_agent::NotesAgent;
use crate::prompts;

pub const PERSONAL_ASSISTANT: &str = "personal_assistant";

pub struct Orchestrator {
    agent_loop: AgentLoop,
}

impl Orchestrator {
    pub fn new(agent_loop: AgentLoop) -> Self {
        Self { agent_loop }
    }

    /// Wire the three sub-agent tools from config into a coordinator loop,
    /// with a notes agent of its own over the configured store.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, concierge_core::Error> {
        let service = concierge_tools::note_service(&config.store, event_bus.clone())?;
        let notes = NotesAgent::from_config(
            config,
            provider.clone(),
            Arc::new(service),
            event_bus.clone(),
        );
        Self::with_notes_agent(config, provider, Arc::new(notes), event_bus)
    }

    /// Like [`Orchestrator::from_config`], but `query_notes_agent` calls
    /// the given agent.
    pub fn with_notes_agent(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        notes: Arc<dyn Agent>,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, concierge_core::Error> {
        let tools = concierge_tools::orchestrator_registry(&config.agents, notes)?;
        let agent_loop = AgentLoop::new(
            provider,
            &config.default_model,
            config.default_temperature,
            Arc::new(tools),
            prompts::coordinator_system_prompt(),
            event_bus,
        )
        .with_max_tokens(config.default_max_tokens)
        .with_max_iterations(config.max_tool_iterations);
        Ok(Self::new(agent_loop))
    }
}

#[async_trait]
impl Agent for Orchestrator {
    fn name(&self) -> &str {
        PERSONAL_ASSISTANT
    }

    fn description(&self) -> &str {
        prompts::PERSONAL_ASSISTANT_DESCRIPTION
    }

    /// Never fails: errors become the reply text.
    async fn run(&self, input: &str) -> concierge_core::Result<String> {
        info!(agent = PERSONAL_ASSISTANT, "Handling query");
        let mut conversation = Conversation::new();
        conversation.push(Message::user(prompts::coordinator_task(input)));

        match self.agent_loop.process(&mut conversation).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!(agent = PERSONAL_ASSISTANT, error = %e, "Coordinator failed");
                Ok(format!("Error in Personal Assistant: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_text_response, make_tool_call_response, SequentialMockProvider};
    use concierge_config::SubAgentConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with_expense_at(url: String) -> AppConfig {
        let mut config = AppConfig::default();
        config.agents.expense = SubAgentConfig {
            url,
            agent_name: "expense_tracker".into(),
            timeout_secs: 5,
        };
        // Nothing listens on port 9 locally
        config.agents.meeting.url = "http://127.0.0.1:9".into();
        config
    }

    #[tokio::test]
    async fn greeting_is_answered_without_tools() {
        let provider = Arc::new(SequentialMockProvider::new(vec![make_text_response(
            "Hello! How can I assist you today?",
        )]));
        let orchestrator = Orchestrator::from_config(
            &AppConfig::default(),
            provider.clone(),
            Arc::new(EventBus::default()),
        )
        .unwrap();

        let reply = orchestrator.run("hi").await.unwrap();
        assert_eq!(reply, "Hello! How can I assist you today?");
        assert_eq!(provider.call_count(), 1);

        let request = &provider.requests()[0];
        assert_eq!(request.tools.len(), 3);
        assert_eq!(request.max_tokens, Some(1024));
        assert!(request.messages[1].content.contains("intelligently: hi"));
    }

    #[tokio::test]
    async fn expense_query_is_forwarded_and_merged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/runs"))
            .and(body_partial_json(json!({
                "agent_name": "expense_tracker",
                "input": [{"parts": [{"content": "food expenses last month"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "run_id": "r",
                "agent_name": "expense_tracker",
                "status": "completed",
                "output": [{"role": "agent/expense_tracker", "parts": [{"content": "$100 dinner x3"}]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response(
                "call_0",
                "query_expense_agent",
                r#"{"query":"food expenses last month"}"#,
            ),
            make_text_response("💰 **Food Expenses for Last Month**\n\n**Total**: $300.00"),
        ]));
        let orchestrator = Orchestrator::from_config(
            &config_with_expense_at(server.uri()),
            provider.clone(),
            Arc::new(EventBus::default()),
        )
        .unwrap();

        let reply = orchestrator.run("Show my food expenses for last month").await.unwrap();
        assert!(reply.starts_with("💰"));

        let second = &provider.requests()[1];
        assert_eq!(second.messages.last().unwrap().content, "$100 dinner x3");
    }

    #[tokio::test]
    async fn unreachable_agent_is_reported_to_llm() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response("call_0", "query_meeting_agent", r#"{"query":"today"}"#),
            make_text_response("The Meeting Manager is unavailable right now."),
        ]));
        let orchestrator = Orchestrator::from_config(
            &config_with_expense_at("http://127.0.0.1:9".into()),
            provider.clone(),
            Arc::new(EventBus::default()),
        )
        .unwrap();

        orchestrator.run("What meetings do I have today?").await.unwrap();
        let tool_reply = provider.requests()[1].messages.last().unwrap().content.clone();
        assert!(tool_reply.starts_with("Unable to contact Meeting Manager: "));
    }

    #[tokio::test]
    async fn provider_failure_becomes_reply_text() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let orchestrator = Orchestrator::from_config(
            &AppConfig::default(),
            provider,
            Arc::new(EventBus::default()),
        )
        .unwrap();

        let reply = orchestrator.run("hello").await.unwrap();
        assert!(reply.starts_with("Error in Personal Assistant: "));
    }

    #[test]
    fn manifest_uses_acp_name() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let orchestrator = Orchestrator::from_config(
            &AppConfig::default(),
            provider,
            Arc::new(EventBus::default()),
        )
        .unwrap();
        let manifest = orchestrator.manifest();
        assert_eq!(manifest.name, "personal_assistant");
        assert!(manifest.description.starts_with("# Personal Assistant Orchestrator"));
    }

    #[tokio::test]
    async fn notes_query_is_answered_in_process() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            // coordinator routes to the notes agent
            make_tool_call_response("call_0", "query_notes_agent", r#"{"query":"add a note: buy milk"}"#),
            // notes agent stores the note
            make_tool_call_response("call_1", "add_note", r#"{"content":"buy milk"}"#),
            make_text_response("Your note has been added!"),
            // coordinator merges
            make_text_response("📋 Noted: buy milk"),
        ]));
        let orchestrator = Orchestrator::from_config(
            &AppConfig::default(),
            provider.clone(),
            Arc::new(EventBus::default()),
        )
        .unwrap();

        let reply = orchestrator.run("Add a note to buy milk").await.unwrap();
        assert_eq!(reply, "📋 Noted: buy milk");
        assert_eq!(provider.call_count(), 4);

        // The notes agent saw its own task and tools
        let notes_request = &provider.requests()[1];
        assert_eq!(notes_request.tools.len(), 3);
        assert!(notes_request.messages[1].content.contains("'add a note: buy milk'"));

        // The coordinator got the notes agent's reply as the tool result
        let merged = &provider.requests()[3];
        assert_eq!(merged.messages.last().unwrap().content, "Your note has been added!");
    }
}
