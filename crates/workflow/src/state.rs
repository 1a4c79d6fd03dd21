//! Run-state threaded through orchestration steps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use pharmaflow_alerts::AlertOutcome;
use pharmaflow_core::{BranchId, DepotId, ItemId, OutcomeStatus, RebalancePolicy, RunId};
use pharmaflow_forecast::ForecastOutcome;
use pharmaflow_rebalance::MatchOutcome;
use pharmaflow_routing::RouteOutcome;

/// Overall run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Error,
}

/// One executed step's log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLogEntry {
    pub agent: String,
    pub timestamp: DateTime<Utc>,
    pub status: OutcomeStatus,
    pub summary: String,
}

/// What a caller wants from one orchestrated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunGoal {
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(default)]
    pub depot_id: Option<DepotId>,
    #[serde(default)]
    pub destinations: Vec<BranchId>,
    pub horizon_days: u32,
    pub policy: RebalancePolicy,
}

impl Default for RunGoal {
    fn default() -> Self {
        Self {
            item_id: None,
            depot_id: None,
            destinations: Vec::new(),
            horizon_days: 30,
            policy: RebalancePolicy::default(),
        }
    }
}

impl RunGoal {
    pub fn for_item(item_id: impl Into<ItemId>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            ..Self::default()
        }
    }

    pub fn with_route(
        mut self,
        depot_id: impl Into<DepotId>,
        destinations: impl IntoIterator<Item = BranchId>,
    ) -> Self {
        self.depot_id = Some(depot_id.into());
        self.destinations = destinations.into_iter().collect();
        self
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_policy(mut self, policy: RebalancePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// The mutable record threaded through orchestration steps.
///
/// Mutated exclusively by steps, each working on a fresh snapshot
/// (copy-before-mutate), so a failing step can never leave a half-written
/// state behind. Created per invocation; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub run_id: RunId,

    // Goal inputs.
    pub item_id: Option<ItemId>,
    pub depot_id: Option<DepotId>,
    pub destinations: Vec<BranchId>,
    pub horizon_days: u32,
    pub policy: RebalancePolicy,

    // Step outputs.
    pub demand_forecast: Option<ForecastOutcome>,
    pub route_plan: Option<RouteOutcome>,
    pub transfer_plan: Option<MatchOutcome>,
    pub alerts: Option<AlertOutcome>,

    // Bookkeeping.
    pub agent_logs: Vec<AgentLogEntry>,
    pub kpi_metrics: BTreeMap<String, JsonValue>,
    pub status: RunStatus,
    pub error_message: Option<String>,
}

impl RunState {
    pub fn new(goal: RunGoal) -> Self {
        Self {
            run_id: RunId::new(),
            item_id: goal.item_id,
            depot_id: goal.depot_id,
            destinations: goal.destinations,
            horizon_days: goal.horizon_days,
            policy: goal.policy,
            demand_forecast: None,
            route_plan: None,
            transfer_plan: None,
            alerts: None,
            agent_logs: Vec::new(),
            kpi_metrics: BTreeMap::new(),
            status: RunStatus::Running,
            error_message: None,
        }
    }

    /// Append a log line for an executed step.
    pub fn log_step(
        &mut self,
        agent: impl Into<String>,
        status: OutcomeStatus,
        summary: impl Into<String>,
    ) {
        self.agent_logs.push(AgentLogEntry {
            agent: agent.into(),
            timestamp: Utc::now(),
            status,
            summary: summary.into(),
        });
    }

    /// Record a step failure without clearing previously computed outputs.
    pub fn record_failure(&mut self, agent: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(run_id = %self.run_id, agent, error = %message, "workflow step failed");
        self.log_step(agent, OutcomeStatus::Error, message.clone());
        self.error_message = Some(message);
    }
}
