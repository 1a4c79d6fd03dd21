//! Forecast result envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pharmaflow_core::OutcomeStatus;

use crate::metrics::AccuracyMetrics;

/// One forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Mean confidence band over the forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Structured forecast result. Every call site receives one of these;
/// `no_data` and `error` are reported here, not raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub points: Vec<ForecastPoint>,
    pub metrics: AccuracyMetrics,
    pub confidence_interval: ConfidenceInterval,
    /// Strategy that actually produced the result (after fallback).
    pub model: String,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl ForecastOutcome {
    pub fn no_data() -> Self {
        Self {
            points: Vec::new(),
            metrics: AccuracyMetrics::default(),
            confidence_interval: ConfidenceInterval::default(),
            model: "none".to_string(),
            status: OutcomeStatus::NoData,
            message: Some("no historical data available for forecasting".to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            points: Vec::new(),
            metrics: AccuracyMetrics::default(),
            confidence_interval: ConfidenceInterval::default(),
            model: "error".to_string(),
            status: OutcomeStatus::Error,
            message: Some(message.into()),
        }
    }
}
