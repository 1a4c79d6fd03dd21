//! `pharmaflow-workflow` — conditional task orchestration.
//!
//! A fixed set of decision steps runs in a data-dependent order over a shared
//! run-state. The order is an explicit finite-state machine with a pure
//! transition function, executed by either the graph dispatcher or the linear
//! fallback; both produce structurally identical run-states.
//!
//! Steps never abort a run: a failing step records its failure and the run
//! still reaches the summary reduction. Only a dispatcher invariant breach
//! moves a run to `Error`, and even then previously produced outputs are
//! preserved.

pub mod machine;
pub mod orchestrator;
pub mod state;

pub use machine::{next_state, WorkflowState};
pub use orchestrator::{EngineCapability, WorkflowOrchestrator};
pub use state::{AgentLogEntry, RunGoal, RunState, RunStatus};
