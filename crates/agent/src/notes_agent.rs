//! The `notes_agent`: adds, lists and updates notes through the note tools.
//!
//! Runs in process; the orchestrator reaches it through `query_notes_agent`.

use async_trait::async_trait;
use concierge_config::AppConfig;
use concierge_core::agent::Agent;
use concierge_core::event::EventBus;
use concierge_core::message::{Conversation, Message};
use concierge_core::provider::Provider;
use concierge_tools::NoteService;
use std::sync::Arc;
use tracing::info;

use crate::loop_runner::AgentLoop;
use crate::prompts;

pub const NOTES_AGENT: &str = "notes_agent";

pub struct NotesAgent {
    agent_loop: AgentLoop,
}

impl NotesAgent {
    pub fn new(agent_loop: AgentLoop) -> Self {
        Self { agent_loop }
    }

    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        service: Arc<NoteService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let agent_loop = AgentLoop::new(
            provider,
            &config.default_model,
            config.default_temperature,
            Arc::new(concierge_tools::notes_registry(service)),
            prompts::notes_system_prompt(),
            event_bus,
        )
        .with_max_tokens(config.default_max_tokens)
        .with_max_iterations(config.max_tool_iterations);
        Self::new(agent_loop)
    }
}

#[async_trait]
impl Agent for NotesAgent {
    fn name(&self) -> &str {
        NOTES_AGENT
    }

    fn description(&self) -> &str {
        prompts::NOTES_DESCRIPTION
    }

    async fn run(&self, input: &str) -> concierge_core::Result<String> {
        info!(agent = NOTES_AGENT, "Handling query");
        let mut conversation = Conversation::new();
        conversation.push(Message::user(prompts::notes_task(input)));
        self.agent_loop.process(&mut conversation).await
    }
}
