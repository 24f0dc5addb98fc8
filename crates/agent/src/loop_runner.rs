//! The tool-calling agent loop.

use chrono::Utc;
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::message::{Conversation, Message, Role};
use concierge_core::provider::{Provider, ProviderRequest};
use concierge_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MAX_ITERATIONS_REPLY: &str =
    "I've reached the maximum number of tool call iterations. Please provide further guidance.";

/// Drives one conversation: LLM call, tool execution, repeat.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    model: String,

    temperature: f32,

    /// Max tokens per LLM response
    max_tokens: Option<u32>,

    tools: Arc<ToolRegistry>,

    /// Always the first message of the conversation
    system_prompt: String,

    /// Maximum LLM round-trips per query
    max_iterations: usize,

    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        system_prompt: impl Into<String>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            system_prompt: system_prompt.into(),
            max_iterations: 10,
            event_bus,
        }
    }

    /// Set the maximum number of LLM round-trips.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the conversation until the LLM answers with text.
    ///
    /// Tool failures are fed back to the LLM as `Error: …` results so it
    /// can recover; only provider failures abort the loop.
    pub async fn process(
        &self,
        conversation: &mut Conversation,
    ) -> Result<String, concierge_core::Error> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing conversation"
        );

        if conversation.messages.first().map(|m| m.role) == Some(Role::System) {
            conversation.messages[0] = Message::system(&self.system_prompt);
        } else {
            conversation
                .messages
                .insert(0, Message::system(&self.system_prompt));
        }

        let tool_definitions = self.tools.definitions();

        for iteration in 1..=self.max_iterations {
            debug!(conversation_id = %conversation.id, iteration, "Agent loop iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    conversation_id: conversation.id.to_string(),
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: Utc::now(),
                });
            }

            if response.message.tool_calls.is_empty() {
                let text = response.message.content.clone();
                conversation.push(response.message);
                return Ok(text);
            }

            debug!(tool_count = response.message.tool_calls.len(), "Executing tool calls");

            let tool_calls = response.message.tool_calls.clone();
            conversation.push(response.message);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                let start = std::time::Instant::now();
                let result = self.tools.execute(&call).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                let (success, output) = match result {
                    Ok(tool_result) => (tool_result.success, tool_result.output),
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool execution failed");
                        (false, format!("Error: {e}"))
                    }
                };

                self.event_bus.publish(DomainEvent::ToolExecuted {
                    tool_name: tc.name.clone(),
                    success,
                    duration_ms,
                    timestamp: Utc::now(),
                });
                conversation.push(Message::tool_result(&tc.id, output));
            }
        }

        warn!(
            conversation_id = %conversation.id,
            iterations = self.max_iterations,
            "Max tool iterations reached"
        );
        Ok(MAX_ITERATIONS_REPLY.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        make_text_response, make_tool_call_response, EchoTool, SequentialMockProvider,
    };

    fn agent(provider: Arc<SequentialMockProvider>, bus: Arc<EventBus>) -> AgentLoop {
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(EchoTool));
        AgentLoop::new(provider, "mock-model", 0.7, Arc::new(tools), "You are terse.", bus)
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(SequentialMockProvider::new(vec![make_text_response(
            "Hello! How can I help?",
        )]));
        let agent = agent(provider.clone(), Arc::new(EventBus::default()));

        let mut conv = Conversation::new();
        conv.push(Message::user("Hello!"));

        let response = agent.process(&mut conv).await.unwrap();
        assert_eq!(response, "Hello! How can I help?");
        // System + User + Assistant
        assert_eq!(conv.messages.len(), 3);
        assert_eq!(conv.messages[0].role, Role::System);
        assert_eq!(conv.messages[0].content, "You are terse.");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn tool_call_then_text() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response("call_1", "echo", r#"{"text":"ping"}"#),
            make_text_response("The tool said ping."),
        ]));
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let agent = agent(provider.clone(), bus);

        let mut conv = Conversation::new();
        conv.push(Message::user("Echo ping"));

        let response = agent.process(&mut conv).await.unwrap();
        assert_eq!(response, "The tool said ping.");
        assert_eq!(provider.call_count(), 2);

        // system, user, assistant(tool call), tool, assistant
        assert_eq!(conv.messages.len(), 5);
        assert_eq!(conv.messages[3].role, Role::Tool);
        assert_eq!(conv.messages[3].content, "ping");
        assert_eq!(conv.messages[3].tool_call_id.as_deref(), Some("call_1"));

        // The second request carried the tool output
        let second = &provider.requests()[1];
        assert_eq!(second.messages.last().unwrap().content, "ping");
        assert_eq!(second.tools.len(), 1);

        let mut saw_tool_event = false;
        while let Ok(event) = rx.try_recv() {
            if let DomainEvent::ToolExecuted { tool_name, success, .. } = event.as_ref() {
                assert_eq!(tool_name, "echo");
                assert!(success);
                saw_tool_event = true;
            }
        }
        assert!(saw_tool_event);
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_llm() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response("call_1", "does_not_exist", "{}"),
            make_text_response("Sorry, that failed."),
        ]));
        let agent = agent(provider, Arc::new(EventBus::default()));

        let mut conv = Conversation::new();
        conv.push(Message::user("Do something"));

        let response = agent.process(&mut conv).await.unwrap();
        assert_eq!(response, "Sorry, that failed.");
        assert!(conv.messages[3].content.starts_with("Error: "));
    }

    #[tokio::test]
    async fn iteration_cap_stops_the_loop() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_tool_call_response("c1", "echo", r#"{"text":"a"}"#),
            make_tool_call_response("c2", "echo", r#"{"text":"b"}"#),
            make_tool_call_response("c3", "echo", r#"{"text":"c"}"#),
        ]));
        let agent = agent(provider.clone(), Arc::new(EventBus::default())).with_max_iterations(2);

        let mut conv = Conversation::new();
        conv.push(Message::user("Loop forever"));

        let response = agent.process(&mut conv).await.unwrap();
        assert_eq!(response, MAX_ITERATIONS_REPLY);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let agent = agent(provider, Arc::new(EventBus::default()));

        let mut conv = Conversation::new();
        conv.push(Message::user("Hello"));

        let err = agent.process(&mut conv).await.unwrap_err();
        assert!(matches!(err, concierge_core::Error::Provider(_)));
    }

    #[tokio::test]
    async fn max_tokens_is_forwarded() {
        let provider = Arc::new(SequentialMockProvider::new(vec![make_text_response("ok")]));
        let agent = agent(provider.clone(), Arc::new(EventBus::default())).with_max_tokens(1024);

        let mut conv = Conversation::new();
        conv.push(Message::user("hi"));
        agent.process(&mut conv).await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.max_tokens, Some(1024));
        assert_eq!(request.model, "mock-model");
    }
}
