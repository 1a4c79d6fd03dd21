//! Route-planning request parameters.

use serde::{Deserialize, Serialize};

use pharmaflow_core::{BranchId, DepotId};

/// Solver objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteObjective {
    #[default]
    MinDistance,
    MinTime,
    MinCost,
}

/// One delivery-route planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub depot_id: DepotId,
    pub destinations: Vec<BranchId>,
    /// Vehicle capacity in units.
    pub vehicle_capacity: u32,
    /// Route time budget in hours.
    pub max_time_hours: u32,
    pub objective: RouteObjective,
}

impl RouteRequest {
    pub fn new(
        depot_id: impl Into<DepotId>,
        destinations: impl IntoIterator<Item = BranchId>,
    ) -> Self {
        Self {
            depot_id: depot_id.into(),
            destinations: destinations.into_iter().collect(),
            vehicle_capacity: 500,
            max_time_hours: 8,
            objective: RouteObjective::default(),
        }
    }

    pub fn with_vehicle_capacity(mut self, vehicle_capacity: u32) -> Self {
        self.vehicle_capacity = vehicle_capacity;
        self
    }

    pub fn with_max_time_hours(mut self, max_time_hours: u32) -> Self {
        self.max_time_hours = max_time_hours;
        self
    }

    pub fn with_objective(mut self, objective: RouteObjective) -> Self {
        self.objective = objective;
        self
    }
}
