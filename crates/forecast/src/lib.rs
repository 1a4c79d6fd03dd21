//! `pharmaflow-forecast` — demand-forecasting provider boundary.
//!
//! The statistical/neural model internals are external collaborators; this
//! crate owns the seam: input series preparation, the [`ForecastModel`]
//! strategy trait, the name-keyed [`ForecastEngine`] with its fallback chain,
//! and the always-available moving-average baseline.
//!
//! Strategy resolution: an unknown model name falls back to the primary
//! strategy; an unavailable strategy falls back to the moving-average
//! baseline. The baseline has no external dependency and cannot be
//! unregistered.

pub mod engine;
pub mod metrics;
pub mod moving_average;
pub mod outcome;
pub mod series;

pub use engine::{ForecastEngine, ForecastModel, UnavailableModel, MOVING_AVERAGE, NEURAL, SEASONAL};
pub use metrics::AccuracyMetrics;
pub use moving_average::MovingAverageModel;
pub use outcome::{ConfidenceInterval, ForecastOutcome, ForecastPoint};
pub use series::DemandSeries;

use serde::{Deserialize, Serialize};

use pharmaflow_core::ItemId;

/// A forecast request in canonical field order.
///
/// These five fields are exactly what the forecast cache fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Entity kind the forecast is scoped to (`branch`, `pharmacy`, ...).
    pub entity_type: String,
    /// Scoping entity, when the forecast is location-specific.
    #[serde(default)]
    pub entity_id: Option<String>,
    pub item_id: ItemId,
    pub horizon_days: u32,
    /// Strategy name; unknown names resolve to the primary strategy.
    pub model: String,
}

impl ForecastRequest {
    pub fn for_item(item_id: impl Into<ItemId>) -> Self {
        Self {
            entity_type: "item".to_string(),
            entity_id: None,
            item_id: item_id.into(),
            horizon_days: 30,
            model: SEASONAL.to_string(),
        }
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
