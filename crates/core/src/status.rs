//! Outcome statuses reported at every component boundary.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Status attached to every component-level result.
///
/// `NoData` and `Error` are normal, reportable outcomes; `Fallback` marks a
/// result produced by a degraded (non-solver / placeholder) path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    NoData,
    Error,
    Fallback,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success)
    }

    /// Map an internal failure onto the status it is reported as.
    pub fn from_error(err: &AgentError) -> Self {
        match err {
            AgentError::NoData(_) => OutcomeStatus::NoData,
            AgentError::UpstreamUnavailable(_) => OutcomeStatus::Fallback,
            AgentError::UpstreamTimeout { .. } | AgentError::Internal(_) => OutcomeStatus::Error,
        }
    }
}

impl core::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::NoData => "no_data",
            OutcomeStatus::Error => "error",
            OutcomeStatus::Fallback => "fallback",
        };
        f.write_str(s)
    }
}
