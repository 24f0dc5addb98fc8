//! Tools that forward a query to a sub-agent.
//!
//! Meeting and expense agents are remote ACP servers; the notes agent runs
//! in this process. Failures are handed back to the LLM as text
//! (`Unable to contact …`) so the coordinator can tell the user which
//! service is down.

use async_trait::async_trait;
use concierge_config::SubAgentConfig;
use concierge_core::agent::Agent;
use concierge_core::error::{AgentError, ToolError};
use concierge_core::tool::{Tool, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::acp_client::AcpClient;

/// Where a forwarded query goes.
enum Target {
    Remote { agent_name: String, client: AcpClient },
    InProcess(Arc<dyn Agent>),
}

impl Target {
    fn agent_name(&self) -> &str {
        match self {
            Target::Remote { agent_name, .. } => agent_name.as_str(),
            Target::InProcess(agent) => agent.name(),
        }
    }

    async fn ask(&self, query: &str) -> Result<String, String> {
        match self {
            Target::Remote { agent_name, client } => client
                .run_sync(agent_name, query)
                .await
                .map_err(|e| e.to_string()),
            Target::InProcess(agent) => agent.run(query).await.map_err(|e| e.to_string()),
        }
    }
}

pub struct SubAgentTool {
    tool_name: &'static str,
    display_name: &'static str,
    description: &'static str,
    target: Target,
}

impl SubAgentTool {
    fn build(
        tool_name: &'static str,
        display_name: &'static str,
        description: &'static str,
        config: &SubAgentConfig,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            tool_name,
            display_name,
            description,
            target: Target::Remote {
                agent_name: config.agent_name.clone(),
                client: AcpClient::new(&config.url, Duration::from_secs(config.timeout_secs))?,
            },
        })
    }

    pub fn meeting(config: &SubAgentConfig) -> Result<Self, AgentError> {
        Self::build(
            "query_meeting_agent",
            "Meeting Manager",
            "Query the meeting management agent for scheduling and calendar related tasks",
            config,
        )
    }

    pub fn expense(config: &SubAgentConfig) -> Result<Self, AgentError> {
        Self::build(
            "query_expense_agent",
            "Expense Tracker",
            "Query the expense tracking agent for financial management tasks",
            config,
        )
    }

    /// Calls `agent` directly instead of going over ACP.
    pub fn notes(agent: Arc<dyn Agent>) -> Self {
        Self {
            tool_name: "query_notes_agent",
            display_name: "Notes Agent",
            description: "Query the notes agent for note-taking tasks",
            target: Target::InProcess(agent),
        }
    }

    pub fn display_name(&self) -> &str {
        self.display_name
    }
}

#[async_trait]
impl Tool for SubAgentTool {
    fn name(&self) -> &str {
        self.tool_name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The request to forward, in natural language"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        Ok(match self.target.ask(query).await {
            Ok(reply) => ToolResult::text(reply),
            Err(e) => {
                warn!(agent = %self.target.agent_name(), error = %e, "Sub-agent call failed");
                ToolResult::failure(format!("Unable to contact {}: {e}", self.display_name))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: String, agent_name: &str) -> SubAgentConfig {
        SubAgentConfig {
            url,
            agent_name: agent_name.into(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn forwards_query_to_configured_agent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/runs"))
            .and(body_partial_json(json!({"agent_name": "expense_tracker"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "run_id": "r",
                "agent_name": "expense_tracker",
                "status": "completed",
                "output": [{"role": "agent/expense_tracker", "parts": [{"content": "$12 on lunch"}]}]
            })))
            .mount(&server)
            .await;

        let tool = SubAgentTool::expense(&config(server.uri(), "expense_tracker")).unwrap();
        assert_eq!(tool.name(), "query_expense_agent");
        let result = tool.execute(json!({"query": "lunch spend"})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "$12 on lunch");
    }

    #[tokio::test]
    async fn unreachable_agent_becomes_text() {
        // Nothing listens on port 9 locally
        let tool = SubAgentTool::meeting(&config("http://127.0.0.1:9".into(), "meeting_manager")).unwrap();
        let result = tool.execute(json!({"query": "today"})).await.unwrap();
        assert!(!result.success);
        assert!(result.output.starts_with("Unable to contact Meeting Manager: "));
    }

    #[tokio::test]
    async fn missing_query_is_invalid() {
        let tool = SubAgentTool::expense(&config("http://127.0.0.1:9".into(), "expense_tracker")).unwrap();
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    /// Answers with a canned note list; fails on "boom".
    struct Notebook;

    #[async_trait]
    impl Agent for Notebook {
        fn name(&self) -> &str {
            "notes"
        }

        fn description(&self) -> &str {
            "Lists notes"
        }

        async fn run(&self, input: &str) -> concierge_core::Result<String> {
            if input == "boom" {
                return Err(concierge_core::Error::Internal("notes store offline".into()));
            }
            Ok(format!("1 note matches '{input}'"))
        }
    }

    #[tokio::test]
    async fn notes_are_answered_in_process() {
        let tool = SubAgentTool::notes(Arc::new(Notebook));
        assert_eq!(tool.name(), "query_notes_agent");
        let result = tool.execute(json!({"query": "show my notes"})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "1 note matches 'show my notes'");
    }

    #[tokio::test]
    async fn in_process_failure_becomes_text() {
        let tool = SubAgentTool::notes(Arc::new(Notebook));
        let result = tool.execute(json!({"query": "boom"})).await.unwrap();
        assert!(!result.success);
        assert!(result.output.starts_with("Unable to contact Notes Agent: "));
        assert!(result.output.contains("notes store offline"));
    }
}
