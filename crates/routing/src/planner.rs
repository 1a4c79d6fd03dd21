//! Route planner facade with the deterministic fallback.

use std::sync::Arc;

use pharmaflow_core::{AgentError, OutcomeStatus};

use crate::request::RouteRequest;
use crate::solver::{NullRouteSolver, RouteSolver};
use crate::RouteOutcome;

/// Flat distance estimate per stop for the fallback route (km).
const FALLBACK_KM_PER_STOP: f64 = 25.0;
/// Flat time estimate per stop for the fallback route (hours).
const FALLBACK_HOURS_PER_STOP: f64 = 1.5;
/// Delivery cost per kilometre (USD).
const COST_PER_KM: f64 = 2.5;

/// Plans delivery routes through the configured solver, degrading to a
/// sequential visiting order when the solver is unavailable or finds no
/// solution.
#[derive(Clone)]
pub struct RoutePlanner {
    solver: Arc<dyn RouteSolver>,
}

impl RoutePlanner {
    pub fn new(solver: Arc<dyn RouteSolver>) -> Self {
        Self { solver }
    }

    /// Planner with no external solver; every plan uses the fallback.
    pub fn without_solver() -> Self {
        Self::new(Arc::new(NullRouteSolver))
    }

    pub fn plan(&self, request: &RouteRequest) -> RouteOutcome {
        if request.destinations.is_empty() {
            return RouteOutcome::no_data("no destinations to route");
        }

        match self.solver.solve(request) {
            Ok(Some(solved)) => RouteOutcome {
                sequence: solved.sequence,
                total_distance_km: solved.total_distance_km,
                total_time_hours: solved.total_time_hours,
                total_cost_usd: solved.total_cost_usd,
                savings_vs_baseline: format!("{:.1}%", solved.savings_pct.max(0.0)),
                vehicles_used: 1,
                method: "vrp_solver".to_string(),
                status: OutcomeStatus::Success,
                message: None,
            },
            Ok(None) => {
                tracing::warn!(depot = %request.depot_id, "solver found no route, using sequential fallback");
                self.fallback(request, "optimization found no solution, using simple route")
            }
            Err(AgentError::UpstreamUnavailable(reason)) => {
                tracing::info!(reason = %reason, "routing solver unavailable, using sequential fallback");
                self.fallback(request, "solver unavailable, using simple route")
            }
            Err(err) => RouteOutcome::error(err.to_string()),
        }
    }

    /// Deterministic sequential route: depot, destinations in given order,
    /// back to the depot, with flat per-stop estimates.
    fn fallback(&self, request: &RouteRequest, message: &str) -> RouteOutcome {
        let mut sequence = Vec::with_capacity(request.destinations.len() + 2);
        sequence.push(request.depot_id.to_string());
        sequence.extend(request.destinations.iter().map(ToString::to_string));
        sequence.push(request.depot_id.to_string());

        let stops = request.destinations.len() as f64;
        let total_distance_km = stops * FALLBACK_KM_PER_STOP;

        RouteOutcome {
            sequence,
            total_distance_km,
            total_time_hours: stops * FALLBACK_HOURS_PER_STOP,
            total_cost_usd: total_distance_km * COST_PER_KM,
            savings_vs_baseline: "0%".to_string(),
            vehicles_used: 1,
            method: "sequential".to_string(),
            status: OutcomeStatus::Fallback,
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaflow_core::{AgentResult, BranchId};

    use crate::solver::SolvedRoute;

    fn request() -> RouteRequest {
        RouteRequest::new(
            "DEPOT-1",
            ["BR-A", "BR-B", "BR-C"].map(BranchId::new),
        )
    }

    #[test]
    fn empty_destinations_is_no_data() {
        let outcome = RoutePlanner::without_solver().plan(&RouteRequest::new("DEPOT-1", []));
        assert_eq!(outcome.status, OutcomeStatus::NoData);
    }

    #[test]
    fn null_solver_degrades_to_sequential_fallback() {
        let outcome = RoutePlanner::without_solver().plan(&request());

        assert_eq!(outcome.status, OutcomeStatus::Fallback);
        assert_eq!(outcome.method, "sequential");
        assert_eq!(
            outcome.sequence,
            vec!["DEPOT-1", "BR-A", "BR-B", "BR-C", "DEPOT-1"]
        );
        assert_eq!(outcome.total_distance_km, 75.0);
        assert_eq!(outcome.total_time_hours, 4.5);
        assert_eq!(outcome.total_cost_usd, 187.5);
        assert_eq!(outcome.savings_vs_baseline, "0%");
    }

    #[test]
    fn solver_solution_is_reported_as_success() {
        struct FixedSolver;
        impl RouteSolver for FixedSolver {
            fn solve(&self, request: &RouteRequest) -> AgentResult<Option<SolvedRoute>> {
                let mut sequence = vec![request.depot_id.to_string()];
                sequence.extend(request.destinations.iter().rev().map(ToString::to_string));
                sequence.push(request.depot_id.to_string());
                Ok(Some(SolvedRoute {
                    sequence,
                    total_distance_km: 48.0,
                    total_time_hours: 3.2,
                    total_cost_usd: 120.0,
                    savings_pct: 17.36,
                }))
            }
        }

        let outcome = RoutePlanner::new(Arc::new(FixedSolver)).plan(&request());
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.method, "vrp_solver");
        assert_eq!(outcome.savings_vs_baseline, "17.4%");
        assert_eq!(outcome.sequence.first().map(String::as_str), Some("DEPOT-1"));
        assert_eq!(outcome.sequence.last().map(String::as_str), Some("DEPOT-1"));
    }

    #[test]
    fn solver_with_no_solution_uses_fallback() {
        struct Stumped;
        impl RouteSolver for Stumped {
            fn solve(&self, _request: &RouteRequest) -> AgentResult<Option<SolvedRoute>> {
                Ok(None)
            }
        }

        let outcome = RoutePlanner::new(Arc::new(Stumped)).plan(&request());
        assert_eq!(outcome.status, OutcomeStatus::Fallback);
        assert_eq!(outcome.method, "sequential");
    }
}
