//! Moving-average baseline strategy.

use pharmaflow_core::{AgentResult, OutcomeStatus};

use crate::engine::{ForecastModel, MOVING_AVERAGE};
use crate::metrics::AccuracyMetrics;
use crate::outcome::{ConfidenceInterval, ForecastOutcome, ForecastPoint};
use crate::series::DemandSeries;

/// Flat forecast at the trailing-window mean, with a fixed ±30% band.
///
/// This is the lowest-tier strategy: no external dependency, always
/// available, and the ultimate fallback for every other strategy.
#[derive(Debug, Clone)]
pub struct MovingAverageModel {
    /// Trailing window length in days (clamped to the series length).
    window: usize,
    lower_factor: f64,
    upper_factor: f64,
}

impl Default for MovingAverageModel {
    fn default() -> Self {
        Self {
            window: 7,
            lower_factor: 0.7,
            upper_factor: 1.3,
        }
    }
}

impl MovingAverageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }
}

impl ForecastModel for MovingAverageModel {
    fn name(&self) -> &str {
        MOVING_AVERAGE
    }

    fn forecast(&self, series: &DemandSeries, horizon_days: u32) -> AgentResult<ForecastOutcome> {
        let Some(last_date) = series.last_date() else {
            return Ok(ForecastOutcome::no_data());
        };

        let window_values = series.tail_values(self.window);
        let avg = window_values.iter().sum::<f64>() / window_values.len() as f64;

        // The trailing window doubles as a hold-out for basic accuracy.
        let predicted = vec![avg; window_values.len()];
        let metrics = AccuracyMetrics::compute(&window_values, &predicted);
        let points = (1..=i64::from(horizon_days))
            .map(|offset| ForecastPoint {
                date: last_date + chrono::Duration::days(offset),
                point_estimate: avg,
                lower_bound: avg * self.lower_factor,
                upper_bound: avg * self.upper_factor,
            })
            .collect();

        Ok(ForecastOutcome {
            points,
            metrics,
            confidence_interval: ConfidenceInterval {
                lower: avg * self.lower_factor,
                upper: avg * self.upper_factor,
            },
            model: MOVING_AVERAGE.to_string(),
            status: OutcomeStatus::Success,
            message: None,
        })
    }
}
