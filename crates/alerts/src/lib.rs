//! `pharmaflow-alerts` — threshold-based operational alerting.
//!
//! Scans inventory positions, raises stockout/overstock/understock alerts,
//! ranks them by severity and age, and summarizes the risk picture. Severity
//! wire casing is SCREAMING_CASE to match the persisted alert documents.

pub mod engine;
pub mod summary;

pub use engine::AlertEngine;
pub use summary::AlertSummary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pharmaflow_core::{BranchId, ItemId, OutcomeStatus};

/// Alert severity. Ordering rank: CRITICAL < WARNING < INFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

impl AlertSeverity {
    pub fn rank(&self) -> u8 {
        match self {
            AlertSeverity::Critical => 0,
            AlertSeverity::Warning => 1,
            AlertSeverity::Info => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    StockoutRisk,
    LowStock,
    Overstock,
    Understock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    UrgentOrder,
    OrderSoon,
    Redistribute,
    CheckInventory,
}

/// One operational alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub branch_id: BranchId,
    pub item_id: ItemId,
    pub alert_type: AlertType,
    pub message: String,
    pub current_stock: f64,
    #[serde(default)]
    pub days_until_stockout: Option<f64>,
    #[serde(default)]
    pub excess_quantity: Option<f64>,
    #[serde(default)]
    pub deficit_quantity: Option<f64>,
    pub recommended_action: RecommendedAction,
    pub timestamp: DateTime<Utc>,
    pub is_resolved: bool,
}

/// Structured alerting result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertOutcome {
    pub alerts: Vec<Alert>,
    pub total_alerts: usize,
    pub summary: AlertSummary,
    /// Advisory insight over the top alerts, or the fixed placeholder.
    pub insight: String,
    pub generated_at: DateTime<Utc>,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl AlertOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            alerts: Vec::new(),
            total_alerts: 0,
            summary: AlertSummary::default(),
            insight: String::new(),
            generated_at: Utc::now(),
            status: OutcomeStatus::Error,
            message: Some(message.into()),
        }
    }
}
