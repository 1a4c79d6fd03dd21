//! Forecast accuracy metrics.

use serde::{Deserialize, Serialize};

/// MAE/RMSE/MAPE over a hold-out window. All `None` when there is nothing to
/// score; MAPE alone is `None` when every actual is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub mape: Option<f64>,
}

impl AccuracyMetrics {
    /// Score `predicted` against `actual`, element-wise.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len().min(predicted.len());
        if n == 0 {
            return Self::default();
        }
        let actual = &actual[..n];
        let predicted = &predicted[..n];

        let mae = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).abs())
            .sum::<f64>()
            / n as f64;

        let mse = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| {
                let d = a - p;
                d * d
            })
            .sum::<f64>()
            / n as f64;

        // MAPE only over non-zero actuals.
        let non_zero: Vec<(f64, f64)> = actual
            .iter()
            .zip(predicted)
            .filter(|(a, _)| **a != 0.0)
            .map(|(a, p)| (*a, *p))
            .collect();
        let mape = if non_zero.is_empty() {
            None
        } else {
            Some(
                non_zero
                    .iter()
                    .map(|(a, p)| ((a - p) / a).abs())
                    .sum::<f64>()
                    / non_zero.len() as f64
                    * 100.0,
            )
        };

        Self {
            mae: Some(mae),
            rmse: Some(mse.sqrt()),
            mape,
        }
    }
}
