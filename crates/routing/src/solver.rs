//! External VRP solver seam.

use pharmaflow_core::{AgentError, AgentResult};

use crate::request::RouteRequest;

/// A solved route as reported by the external solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedRoute {
    /// Ordered stop sequence including the return to the depot.
    pub sequence: Vec<String>,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub total_cost_usd: f64,
    /// Heuristic savings versus the naive baseline route, in percent.
    pub savings_pct: f64,
}

/// The vehicle-routing solver boundary.
///
/// `Ok(None)` means the solver ran but found no feasible solution within its
/// search budget; the planner then uses the sequential fallback.
pub trait RouteSolver: Send + Sync {
    fn solve(&self, request: &RouteRequest) -> AgentResult<Option<SolvedRoute>>;
}

/// Stand-in used when no solver is configured in this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRouteSolver;

impl RouteSolver for NullRouteSolver {
    fn solve(&self, _request: &RouteRequest) -> AgentResult<Option<SolvedRoute>> {
        Err(AgentError::unavailable("no routing solver configured"))
    }
}
