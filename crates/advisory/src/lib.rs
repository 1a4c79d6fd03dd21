//! `pharmaflow-advisory`
//!
//! **Responsibility:** Optional advisory-text collaborator boundary.
//!
//! This crate is intentionally **not** part of the decision logic:
//! - It must not depend on inventory/forecast/routing types.
//! - Its output is free text for humans, never an input to a decision rule.
//! - Absence or failure always degrades to a fixed placeholder; it can never
//!   fail a calling component.
//!
//! Whether a real text generator is configured is resolved once at startup;
//! decision components receive an `AdvisoryService` object and never branch
//! on availability themselves.

use thiserror::Error;

/// Placeholder returned whenever the advisory collaborator is missing or
/// failing.
pub const INSIGHTS_UNAVAILABLE: &str = "insights not available";

#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// No generator configured (missing credentials, disabled feature).
    #[error("advisory service unavailable: {0}")]
    Unavailable(String),

    /// The generator was called and failed.
    #[error("advisory request failed: {0}")]
    RequestFailed(String),
}

/// A free-text advisory generator.
///
/// Implementations wrap an external text service; the prompt is structured
/// free text assembled by the caller.
pub trait AdvisoryService: Send + Sync {
    fn advise(&self, prompt: &str) -> Result<String, AdvisoryError>;

    /// Whether a real generator is behind this service. Purely informational;
    /// callers should go through [`insight_or_placeholder`] rather than
    /// branching on this.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Always-unavailable advisory, used when no generator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdvisory;

impl AdvisoryService for NullAdvisory {
    fn advise(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::Unavailable(
            "no advisory generator configured".to_string(),
        ))
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Canned-reply advisory for tests and demos.
#[derive(Debug, Clone)]
pub struct StaticAdvisory {
    reply: String,
}

impl StaticAdvisory {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl AdvisoryService for StaticAdvisory {
    fn advise(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Ok(self.reply.clone())
    }
}

/// Run the advisory, degrading to [`INSIGHTS_UNAVAILABLE`] on any failure.
pub fn insight_or_placeholder(advisory: &dyn AdvisoryService, prompt: &str) -> String {
    match advisory.advise(prompt) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(error = %err, "advisory degraded to placeholder");
            INSIGHTS_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_advisory_degrades_to_placeholder() {
        let insight = insight_or_placeholder(&NullAdvisory, "anything");
        assert_eq!(insight, INSIGHTS_UNAVAILABLE);
        assert!(!NullAdvisory.is_configured());
    }

    #[test]
    fn static_advisory_passes_through() {
        let advisory = StaticAdvisory::new("shift stock to the coast branches");
        let insight = insight_or_placeholder(&advisory, "prompt");
        assert_eq!(insight, "shift stock to the coast branches");
    }
}
