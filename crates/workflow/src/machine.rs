//! The workflow state machine.

use serde::{Deserialize, Serialize};

use crate::state::RunState;

/// Workflow phases. `Start` is initial; `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Start,
    Forecasting,
    InventoryAnalysis,
    RouteOptimization,
    TransferMatching,
    MonitoringAlerts,
    Summary,
    Completed,
    Error,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Completed | WorkflowState::Error)
    }
}

/// Pure transition function over the run-state's inputs.
///
/// This is the whole routing table; the dispatcher holds no other control
/// flow. `Error` is never produced here; only the dispatcher enters it, on
/// an invariant breach.
pub fn next_state(current: WorkflowState, state: &RunState) -> WorkflowState {
    match current {
        WorkflowState::Start => WorkflowState::Forecasting,
        WorkflowState::Forecasting => WorkflowState::InventoryAnalysis,
        WorkflowState::InventoryAnalysis => {
            if state.depot_id.is_some() && !state.destinations.is_empty() {
                WorkflowState::RouteOptimization
            } else {
                WorkflowState::TransferMatching
            }
        }
        WorkflowState::RouteOptimization => {
            if state.item_id.is_some() {
                WorkflowState::TransferMatching
            } else {
                WorkflowState::MonitoringAlerts
            }
        }
        WorkflowState::TransferMatching => WorkflowState::MonitoringAlerts,
        WorkflowState::MonitoringAlerts => WorkflowState::Summary,
        WorkflowState::Summary => WorkflowState::Completed,
        WorkflowState::Completed => WorkflowState::Completed,
        WorkflowState::Error => WorkflowState::Error,
    }
}
