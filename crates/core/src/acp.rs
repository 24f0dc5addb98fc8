//! Agent Communication Protocol (ACP) wire types.
//!
//! The orchestrator and its sub-agents talk over HTTP with synchronous
//! runs: `POST /runs` carries a [`RunRequest`] and answers with a
//! [`RunResponse`] whose first output message holds the reply text.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TEXT_PLAIN: &str = "text/plain";

/// One content part of an ACP message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(default = "default_content_type")]
    pub content_type: String,

    #[serde(default)]
    pub content: Option<String>,
}

fn default_content_type() -> String {
    TEXT_PLAIN.into()
}

impl MessagePart {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: TEXT_PLAIN.into(),
            content: Some(content.into()),
        }
    }
}

/// An ACP message: a role plus ordered parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcpMessage {
    #[serde(default = "default_role")]
    pub role: String,

    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

fn default_role() -> String {
    "user".into()
}

impl AcpMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            parts: vec![MessagePart::text(content)],
        }
    }

    /// A reply authored by the named agent (`agent/<name>` role).
    pub fn agent(agent_name: &str, content: impl Into<String>) -> Self {
        Self {
            role: format!("agent/{agent_name}"),
            parts: vec![MessagePart::text(content)],
        }
    }

    /// Content of the first part, if it carries text.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(|p| p.content.as_deref())
    }
}

/// Run execution mode. Only synchronous runs are served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Sync,
    Async,
    Stream,
}

/// Body of `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub agent_name: String,

    #[serde(default)]
    pub input: Vec<AcpMessage>,

    #[serde(default)]
    pub mode: RunMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl RunRequest {
    /// A synchronous run with a single user text message.
    pub fn sync(agent_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            input: vec![AcpMessage::user(text)],
            mode: RunMode::Sync,
            session_id: None,
        }
    }

    /// The user's query: text of the first part of the first message.
    pub fn input_text(&self) -> Option<&str> {
        self.input.first().and_then(AcpMessage::first_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Created,
    InProgress,
    Awaiting,
    Cancelling,
    Cancelled,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// Response of `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub run_id: String,

    pub agent_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    pub status: RunStatus,

    #[serde(default)]
    pub output: Vec<AcpMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
}

impl RunResponse {
    pub fn completed(agent_name: &str, text: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            agent_name: agent_name.to_string(),
            session_id: None,
            status: RunStatus::Completed,
            output: vec![AcpMessage::agent(agent_name, text)],
            error: None,
        }
    }

    pub fn failed(agent_name: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            agent_name: agent_name.to_string(),
            session_id: None,
            status: RunStatus::Failed,
            output: Vec::new(),
            error: Some(RunError {
                code: code.to_string(),
                message: message.into(),
            }),
        }
    }

    /// The reply text: first part of the first output message.
    pub fn output_text(&self) -> Option<&str> {
        self.output.first().and_then(AcpMessage::first_text)
    }
}

/// Entry of `GET /agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentManifest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentList {
    pub agents: Vec<AgentManifest>,
}
