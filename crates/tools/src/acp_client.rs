//! Minimal ACP client: synchronous runs against a sub-agent server.

use concierge_core::acp::{AgentList, AgentManifest, RunRequest, RunResponse, RunStatus};
use concierge_core::error::AgentError;
use std::time::Duration;
use tracing::{debug, warn};

pub struct AcpClient {
    base_url: String,
    client: reqwest::Client,
}

impl AcpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AgentError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Unreachable {
                agent: base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /runs` in sync mode and return the first output part's text.
    pub async fn run_sync(&self, agent_name: &str, input: &str) -> Result<String, AgentError> {
        let url = format!("{}/runs", self.base_url);
        debug!(agent = agent_name, url = %url, "Starting ACP run");

        let response = self
            .client
            .post(&url)
            .json(&RunRequest::sync(agent_name, input))
            .send()
            .await
            .map_err(|e| AgentError::Unreachable {
                agent: agent_name.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(agent = agent_name, status = status.as_u16(), body = %body, "ACP run rejected");
            return Err(AgentError::RunFailed {
                agent: agent_name.to_string(),
                reason: format!("HTTP {}: {}", status.as_u16(), body),
            });
        }

        let run: RunResponse = response.json().await.map_err(|e| AgentError::RunFailed {
            agent: agent_name.to_string(),
            reason: format!("invalid run response: {e}"),
        })?;

        if run.status == RunStatus::Failed {
            let reason = run
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "run failed".into());
            return Err(AgentError::RunFailed {
                agent: agent_name.to_string(),
                reason,
            });
        }

        run.output_text()
            .map(str::to_string)
            .ok_or_else(|| AgentError::EmptyOutput(agent_name.to_string()))
    }

    /// `GET /agents`, used to check a server is up.
    pub async fn list_agents(&self) -> Result<Vec<AgentManifest>, AgentError> {
        let url = format!("{}/agents", self.base_url);
        let unreachable = |reason: String| AgentError::Unreachable {
            agent: self.base_url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unreachable(format!("HTTP {}", response.status().as_u16())));
        }
        let list: AgentList = response
            .json()
            .await
            .map_err(|e| unreachable(format!("invalid agent list: {e}")))?;
        Ok(list.agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AcpClient {
        AcpClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn run_sync_sends_acp_body_and_reads_first_part() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/runs"))
            .and(body_partial_json(json!({
                "agent_name": "meeting_manager",
                "mode": "sync",
                "input": [{"role": "user", "parts": [{"content": "today?", "content_type": "text/plain"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "run_id": "r-1",
                "agent_name": "meeting_manager",
                "status": "completed",
                "output": [{"role": "agent/meeting_manager", "parts": [{"content": "Standup at 9"}]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server).run_sync("meeting_manager", "today?").await.unwrap();
        assert_eq!(reply, "Standup at 9");
    }

    #[tokio::test]
    async fn failed_run_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/runs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "run_id": "r-2",
                "agent_name": "expense_tracker",
                "status": "failed",
                "error": {"code": "server_error", "message": "database locked"}
            })))
            .mount(&server)
            .await;

        let err = client(&server).run_sync("expense_tracker", "spend?").await.unwrap_err();
        assert!(err.to_string().contains("database locked"));
    }

    #[tokio::test]
    async fn empty_output_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/runs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "run_id": "r-3",
                "agent_name": "notes_agent",
                "status": "completed",
                "output": []
            })))
            .mount(&server)
            .await;

        let err = client(&server).run_sync("notes_agent", "notes").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyOutput(_)));
    }

    #[tokio::test]
    async fn http_error_status_is_run_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/runs"))
            .respond_with(ResponseTemplate::new(404).set_body_string("agent not found"))
            .mount(&server)
            .await;

        let err = client(&server).run_sync("ghost", "hi").await.unwrap_err();
        assert!(matches!(err, AgentError::RunFailed { .. }));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn list_agents_reads_manifests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "agents": [{"name": "meeting_manager", "description": "Meetings"}]
            })))
            .mount(&server)
            .await;

        let agents = client(&server).list_agents().await.unwrap();
        assert_eq!(agents[0].name, "meeting_manager");
    }
}
