//! Agent trait: anything that can answer an ACP run.
//!
//! The gateway serves every registered [`Agent`] under `POST /runs`.

use async_trait::async_trait;
use crate::acp::AgentManifest;

#[async_trait]
pub trait Agent: Send + Sync {
    /// The ACP agent name (e.g., "personal_assistant").
    fn name(&self) -> &str;

    /// Human-readable description, published in `GET /agents`.
    fn description(&self) -> &str;

    /// Answer one user query with a text reply.
    async fn run(&self, input: &str) -> crate::Result<String>;

    fn manifest(&self) -> AgentManifest {
        AgentManifest {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}
