//! `pharmaflow-routing` — delivery-route planning boundary.
//!
//! The vehicle-routing solver's constraint search is an external
//! collaborator behind [`RouteSolver`]. This crate owns the seam and the
//! deterministic non-solver fallback: visit destinations in their given
//! order with flat per-stop distance/time estimates.

pub mod planner;
pub mod request;
pub mod solver;

pub use planner::RoutePlanner;
pub use request::{RouteObjective, RouteRequest};
pub use solver::{NullRouteSolver, RouteSolver, SolvedRoute};

use serde::{Deserialize, Serialize};

use pharmaflow_core::OutcomeStatus;

/// Structured route-planning result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    /// Ordered stop sequence, starting and ending at the depot.
    pub sequence: Vec<String>,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub total_cost_usd: f64,
    /// Heuristic savings versus a naive baseline route, e.g. `"12.5%"`.
    pub savings_vs_baseline: String,
    pub vehicles_used: u32,
    /// Planning method that produced the result.
    pub method: String,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl RouteOutcome {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            sequence: Vec::new(),
            total_distance_km: 0.0,
            total_time_hours: 0.0,
            total_cost_usd: 0.0,
            savings_vs_baseline: "0%".to_string(),
            vehicles_used: 0,
            method: "none".to_string(),
            status: OutcomeStatus::NoData,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            sequence: Vec::new(),
            total_distance_km: 0.0,
            total_time_hours: 0.0,
            total_cost_usd: 0.0,
            savings_vs_baseline: "0%".to_string(),
            vehicles_used: 0,
            method: "error".to_string(),
            status: OutcomeStatus::Error,
            message: Some(message.into()),
        }
    }
}
