//! Decision-layer error model.

use thiserror::Error;

/// Result type used across the decision components.
pub type AgentResult<T> = Result<T, AgentError>;

/// Failure taxonomy for decision components and their collaborators.
///
/// Components convert these into structured outcomes (`OutcomeStatus`) at
/// their public boundary; callers never see a bare panic or a raw collaborator
/// error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Input records were missing or insufficient. Reported as
    /// `status = no_data`, never thrown to the caller.
    #[error("no data: {0}")]
    NoData(String),

    /// A collaborator call exceeded its time budget.
    #[error("{operation} timed out after {budget_secs}s")]
    UpstreamTimeout { operation: String, budget_secs: u64 },

    /// An optional collaborator is missing or misconfigured. Callers degrade
    /// to rule-based or placeholder output.
    #[error("collaborator unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Unexpected failure inside a decision component.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgentError {
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    pub fn timeout(operation: impl Into<String>, budget_secs: u64) -> Self {
        Self::UpstreamTimeout {
            operation: operation.into(),
            budget_secs,
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
