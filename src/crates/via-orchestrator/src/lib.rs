//! Agent orchestration (spec.md §4.10): the deterministic URL shortcut, the
//! four specialist tools, the background-intelligence worker, and the
//! tool-call loop primitive they all share.

pub mod agent_loop;
pub mod background;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod router;
pub mod specialists;

pub use error::{OrchestratorError, Result};
pub use events::{AgentEvent, AgentEventSink};
pub use orchestrator::Orchestrator;
