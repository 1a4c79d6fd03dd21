//! Service-boundary errors.
//!
//! Component failures are reported inside outcome objects; only the
//! transport-boundary timeout (and a lost worker) terminate a request early.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation exceeded its wall-clock budget. No shared state was
    /// mutated on this path.
    #[error("{operation} timed out after {budget_secs}s")]
    Timeout {
        operation: &'static str,
        budget_secs: u64,
    },

    /// The blocking worker was cancelled or panicked.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}
