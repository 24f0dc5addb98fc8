//! # Concierge Core
//!
//! Domain types, traits, and error definitions for the Concierge personal
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model that the store, tools, providers, agents and gateway crates
//! implement against.
//!
//! ## Seams
//!
//! - [`HealthStore`]: one storage strategy for goals and food logs
//!   (remote table store or process memory)
//! - [`NoteStore`]: the same choice for notes
//! - [`Tool`]: a named capability invocable with JSON arguments
//! - [`Provider`]: an LLM chat-completions backend
//! - [`Agent`]: anything that can answer an ACP run

pub mod backend;
pub mod error;
pub mod health;
pub mod note;
pub mod message;
pub mod provider;
pub mod tool;
pub mod acp;
pub mod agent;
pub mod event;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, Error, ProviderError, Result, StoreError, ToolError};
pub use backend::{BackendKind, StoreBackend};
pub use health::{
    FoodLogEntry, GoalUpdate, HealthGoal, HealthStore, NewFoodLog, NewHealthGoal,
    DAILY_CALORIES_GOAL,
};
pub use note::{NewNote, Note, NoteStore, NoteUpdate};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
pub use acp::{
    AcpMessage, AgentList, AgentManifest, MessagePart, RunError, RunMode, RunRequest, RunResponse,
    RunStatus,
};
pub use agent::Agent;
pub use event::{DomainEvent, EventBus};
