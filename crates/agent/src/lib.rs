//! Agents for Concierge.
//!
//! Every agent is a tool-calling loop:
//!
//! 1. **Receive** a user query (from an ACP run or the CLI)
//! 2. **Build** the task message under the agent's system prompt
//! 3. **Send to LLM** with the agent's tool definitions
//! 4. **If tool calls**: execute them, append results, go back to step 3
//! 5. **If text**: that is the reply
//!
//! [`Orchestrator`] routes to the meeting, expense and notes agents;
//! [`HealthDietAgent`] drives the health tools and [`NotesAgent`] the note
//! tools.

pub mod health_agent;
pub mod loop_runner;
pub mod notes_agent;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use health_agent::{HealthDietAgent, HEALTH_DIET};
pub use loop_runner::AgentLoop;
pub use notes_agent::{NotesAgent, NOTES_AGENT};
pub use orchestrator::{Orchestrator, PERSONAL_ASSISTANT};
pub use prompts::HealthIntent;
