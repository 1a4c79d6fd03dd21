//! Strategy registry and fallback chain.

use std::sync::Arc;

use pharmaflow_core::{AgentError, AgentResult};

use crate::moving_average::MovingAverageModel;
use crate::outcome::ForecastOutcome;
use crate::series::DemandSeries;

/// Primary strategy: seasonality-aware statistical model (external).
pub const SEASONAL: &str = "seasonal";
/// Recurrent neural strategy (external).
pub const NEURAL: &str = "neural";
/// Baseline strategy, always available in-process.
pub const MOVING_AVERAGE: &str = "moving_average";

/// A named forecasting strategy.
///
/// Heavy strategies wrap external model runtimes and may report
/// [`AgentError::UpstreamUnavailable`]; the engine then degrades to the
/// baseline.
pub trait ForecastModel: Send + Sync {
    fn name(&self) -> &str;

    fn forecast(&self, series: &DemandSeries, horizon_days: u32) -> AgentResult<ForecastOutcome>;
}

/// Stand-in for a strategy whose runtime is not configured in this process.
#[derive(Debug, Clone)]
pub struct UnavailableModel {
    name: String,
    reason: String,
}

impl UnavailableModel {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl ForecastModel for UnavailableModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&self, _series: &DemandSeries, _horizon_days: u32) -> AgentResult<ForecastOutcome> {
        Err(AgentError::unavailable(self.reason.clone()))
    }
}

/// Name-keyed strategy registry with a fixed fallback chain.
#[derive(Clone)]
pub struct ForecastEngine {
    models: Vec<Arc<dyn ForecastModel>>,
    primary: String,
    /// Minimum observed days required before any strategy runs.
    min_observed_days: usize,
}

impl ForecastEngine {
    /// Registry with the three canonical strategies. The heavy strategies
    /// start unavailable; processes with the model runtimes configured
    /// replace them via [`ForecastEngine::register`].
    pub fn with_defaults() -> Self {
        Self {
            models: vec![
                Arc::new(UnavailableModel::new(SEASONAL, "seasonal model runtime not configured")),
                Arc::new(UnavailableModel::new(NEURAL, "neural model runtime not configured")),
                Arc::new(MovingAverageModel::new()),
            ],
            primary: SEASONAL.to_string(),
            min_observed_days: 7,
        }
    }

    /// Register (or replace) a strategy under its own name.
    pub fn register(mut self, model: Arc<dyn ForecastModel>) -> Self {
        self.models.retain(|m| m.name() != model.name());
        self.models.push(model);
        self
    }

    fn model(&self, name: &str) -> Option<&Arc<dyn ForecastModel>> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// Run the named strategy over a prepared series.
    ///
    /// Resolution order: unknown name -> primary; unavailable strategy ->
    /// moving-average baseline; any other failure -> `error` outcome. Series
    /// shorter than the minimum -> `no_data` outcome.
    pub fn run(&self, model_name: &str, series: &DemandSeries, horizon_days: u32) -> ForecastOutcome {
        if series.len() < self.min_observed_days {
            tracing::warn!(
                observed_days = series.len(),
                required = self.min_observed_days,
                "insufficient history for forecasting"
            );
            return ForecastOutcome::no_data();
        }

        let model = match self.model(model_name) {
            Some(model) => model,
            None => {
                tracing::warn!(model = model_name, primary = %self.primary, "unknown forecast model, using primary");
                match self.model(&self.primary) {
                    Some(primary) => primary,
                    None => return ForecastOutcome::error("no primary forecast strategy registered"),
                }
            }
        };

        match model.forecast(series, horizon_days) {
            Ok(outcome) => outcome,
            Err(AgentError::UpstreamUnavailable(reason)) => {
                tracing::info!(model = model.name(), reason = %reason, "strategy unavailable, degrading to baseline");
                self.run_baseline(series, horizon_days)
            }
            Err(err) => ForecastOutcome::error(err.to_string()),
        }
    }

    fn run_baseline(&self, series: &DemandSeries, horizon_days: u32) -> ForecastOutcome {
        let Some(baseline) = self.model(MOVING_AVERAGE) else {
            return ForecastOutcome::error("baseline strategy missing from registry");
        };
        match baseline.forecast(series, horizon_days) {
            Ok(outcome) => outcome,
            Err(err) => ForecastOutcome::error(err.to_string()),
        }
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
