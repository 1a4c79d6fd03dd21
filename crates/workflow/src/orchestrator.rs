//! Step execution over the state machine.

use std::sync::Arc;

use serde_json::json;

use pharmaflow_alerts::AlertEngine;
use pharmaflow_core::OutcomeStatus;
use pharmaflow_forecast::{DemandSeries, ForecastEngine, SEASONAL};
use pharmaflow_rebalance::InventoryRebalancer;
use pharmaflow_routing::{RoutePlanner, RouteRequest};
use pharmaflow_store::{InventoryReader, SalesReader};

use crate::machine::{next_state, WorkflowState};
use crate::state::{RunGoal, RunState, RunStatus};

/// Trailing sales window fed into forecasting.
const SALES_HISTORY_DAYS: u32 = 365;
/// Safety budget for the graph dispatcher; the machine's longest path is far
/// shorter.
const MAX_TRANSITIONS: usize = 16;

/// Which execution strategy drives the run.
///
/// Resolved once at startup; components never probe for the graph engine
/// themselves. `Linear` is the fallback used when the graph-dispatch
/// collaborator is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineCapability {
    #[default]
    Graph,
    Linear,
}

/// Sequences the decision agents over a shared run-state.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    engine: EngineCapability,
    sales: Arc<dyn SalesReader>,
    inventory: Arc<dyn InventoryReader>,
    forecast: ForecastEngine,
    forecast_model: String,
    router: RoutePlanner,
    rebalancer: InventoryRebalancer,
    alerts: AlertEngine,
    alert_limit: usize,
}

impl WorkflowOrchestrator {
    pub fn new(
        sales: Arc<dyn SalesReader>,
        inventory: Arc<dyn InventoryReader>,
        forecast: ForecastEngine,
        router: RoutePlanner,
        rebalancer: InventoryRebalancer,
        alerts: AlertEngine,
    ) -> Self {
        Self {
            engine: EngineCapability::default(),
            sales,
            inventory,
            forecast,
            forecast_model: SEASONAL.to_string(),
            router,
            rebalancer,
            alerts,
            alert_limit: 20,
        }
    }

    pub fn with_engine(mut self, engine: EngineCapability) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_forecast_model(mut self, model: impl Into<String>) -> Self {
        self.forecast_model = model.into();
        self
    }

    pub fn with_alert_limit(mut self, alert_limit: usize) -> Self {
        self.alert_limit = alert_limit;
        self
    }

    /// Execute one run to a terminal state.
    pub fn run(&self, goal: RunGoal) -> RunState {
        let state = RunState::new(goal);
        tracing::info!(run_id = %state.run_id, engine = ?self.engine, "workflow started");

        let final_state = match self.engine {
            EngineCapability::Graph => self.run_graph(state),
            EngineCapability::Linear => self.run_linear(state),
        };

        tracing::info!(
            run_id = %final_state.run_id,
            status = ?final_state.status,
            steps = final_state.agent_logs.len(),
            "workflow finished"
        );
        final_state
    }

    /// Graph dispatcher: drive the pure transition table to a terminal state.
    fn run_graph(&self, mut state: RunState) -> RunState {
        let mut current = WorkflowState::Start;
        let mut transitions = 0usize;

        while !current.is_terminal() {
            transitions += 1;
            if transitions > MAX_TRANSITIONS {
                // Unrecoverable dispatcher breach; partial outputs stay put.
                state.status = RunStatus::Error;
                state.error_message =
                    Some("workflow dispatcher exceeded its transition budget".to_string());
                return state;
            }

            current = next_state(current, &state);
            tracing::debug!(run_id = %state.run_id, state = ?current, "workflow transition");

            state = match current {
                WorkflowState::Forecasting => self.step_forecasting(&state),
                WorkflowState::InventoryAnalysis => self.step_inventory_analysis(&state),
                WorkflowState::RouteOptimization => self.step_route_optimization(&state),
                WorkflowState::TransferMatching => self.step_transfer_matching(&state),
                WorkflowState::MonitoringAlerts => self.step_monitoring(&state),
                WorkflowState::Summary => self.step_summary(&state),
                WorkflowState::Start | WorkflowState::Completed | WorkflowState::Error => state,
            };
        }

        state
    }

    /// Linear fallback: fixed step order, silently skipping steps whose
    /// required inputs are absent, then the same summary reduction.
    fn run_linear(&self, mut state: RunState) -> RunState {
        if state.item_id.is_some() {
            state = self.step_forecasting(&state);
        }
        if state.depot_id.is_some() && !state.destinations.is_empty() {
            state = self.step_route_optimization(&state);
        }
        if state.item_id.is_some() {
            state = self.step_transfer_matching(&state);
        }
        state = self.step_monitoring(&state);
        self.step_summary(&state)
    }

    fn step_forecasting(&self, state: &RunState) -> RunState {
        let Some(item_id) = state.item_id.clone() else {
            tracing::warn!(run_id = %state.run_id, "no item for forecasting, skipping");
            return state.clone();
        };

        let mut next = state.clone();
        let sales = match self.sales.daily_sales(&item_id, None, SALES_HISTORY_DAYS) {
            Ok(sales) => sales,
            Err(err) => {
                next.record_failure("forecasting", format!("forecasting failed: {err}"));
                return next;
            }
        };

        let series = DemandSeries::from_daily(sales.iter().map(|r| (r.date, r.quantity)));
        let outcome = self
            .forecast
            .run(&self.forecast_model, &series, state.horizon_days);

        next.log_step(
            "forecasting",
            outcome.status,
            format!("generated {} forecast points", outcome.points.len()),
        );
        next.demand_forecast = Some(outcome);
        next
    }

    /// Pass-through analysis node: the routing decision itself lives in the
    /// transition table.
    fn step_inventory_analysis(&self, state: &RunState) -> RunState {
        let mut next = state.clone();
        next.log_step(
            "inventory_analysis",
            OutcomeStatus::Success,
            "inventory analysis completed",
        );
        next
    }

    fn step_route_optimization(&self, state: &RunState) -> RunState {
        let Some(depot_id) = state.depot_id.clone() else {
            tracing::warn!(run_id = %state.run_id, "no depot for route optimization, skipping");
            return state.clone();
        };
        if state.destinations.is_empty() {
            tracing::warn!(run_id = %state.run_id, "no destinations for route optimization, skipping");
            return state.clone();
        }

        let mut next = state.clone();
        let request = RouteRequest::new(depot_id, state.destinations.iter().cloned());
        let outcome = self.router.plan(&request);

        next.log_step(
            "route_optimization",
            outcome.status,
            format!("planned route with {} stops", outcome.sequence.len()),
        );
        next.route_plan = Some(outcome);
        next
    }

    fn step_transfer_matching(&self, state: &RunState) -> RunState {
        let Some(item_id) = state.item_id.clone() else {
            tracing::warn!(run_id = %state.run_id, "no item for transfer matching, skipping");
            return state.clone();
        };

        let mut next = state.clone();
        let records = match self.inventory.records_for_item(&item_id) {
            Ok(records) => records,
            Err(err) => {
                next.record_failure("inventory_matching", format!("inventory matching failed: {err}"));
                return next;
            }
        };

        let outcome = self.rebalancer.find_matches(&item_id, &records);
        next.log_step(
            "inventory_matching",
            outcome.status,
            format!("proposed {} transfer recommendations", outcome.total_matches),
        );
        next.transfer_plan = Some(outcome);
        next
    }

    fn step_monitoring(&self, state: &RunState) -> RunState {
        let mut next = state.clone();
        let records = match self.inventory.all_records() {
            Ok(records) => records,
            Err(err) => {
                next.record_failure("monitoring", format!("monitoring failed: {err}"));
                return next;
            }
        };

        let outcome = self.alerts.generate(&records, None, self.alert_limit);
        next.log_step(
            "monitoring",
            outcome.status,
            format!("raised {} alerts", outcome.total_alerts),
        );
        next.alerts = Some(outcome);
        next
    }

    /// Reduce the final state into KPI metrics.
    fn step_summary(&self, state: &RunState) -> RunState {
        let mut next = state.clone();

        next.kpi_metrics.insert(
            "alerts_count".to_string(),
            json!(next.alerts.as_ref().map_or(0, |a| a.total_alerts)),
        );
        next.kpi_metrics
            .insert("agents_executed".to_string(), json!(next.agent_logs.len()));
        if let Some(route) = &next.route_plan {
            next.kpi_metrics.insert(
                "route_efficiency".to_string(),
                json!(route.savings_vs_baseline),
            );
        }
        if let Some(plan) = &next.transfer_plan {
            next.kpi_metrics.insert(
                "total_inventory_savings".to_string(),
                json!(plan.total_savings),
            );
        }

        next.status = RunStatus::Completed;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pharmaflow_core::{
        AgentError, AgentResult, AlertThresholds, BranchId, ItemId, OutcomeStatus, RebalancePolicy,
    };
    use pharmaflow_store::{InMemoryStore, InventoryRecord, SalesRecord};

    fn seeded_store() -> Arc<InMemoryStore> {
        let today = Utc::now().date_naive();
        let sales = (0..30).map(move |i| SalesRecord {
            item_id: "para_500".into(),
            branch_id: "BR-1".into(),
            date: today - chrono::Duration::days(i),
            quantity: 20.0,
        });

        Arc::new(
            InMemoryStore::new()
                .with_inventory([
                    InventoryRecord::new("BR-1", "para_500", 200.0, 100.0).with_safe_stock(20.0),
                    InventoryRecord::new("BR-2", "para_500", 5.0, 100.0).with_safe_stock(20.0),
                ])
                .with_sales(sales),
        )
    }

    fn orchestrator(store: Arc<InMemoryStore>) -> WorkflowOrchestrator {
        WorkflowOrchestrator::new(
            store.clone(),
            store,
            ForecastEngine::with_defaults(),
            RoutePlanner::without_solver(),
            InventoryRebalancer::new(RebalancePolicy::default()),
            AlertEngine::new(AlertThresholds::default()),
        )
    }

    fn full_goal() -> RunGoal {
        RunGoal::for_item("para_500")
            .with_route("DEPOT-1", [BranchId::new("BR-1"), BranchId::new("BR-2")])
    }

    #[test]
    fn full_goal_executes_every_step() {
        let state = orchestrator(seeded_store()).run(full_goal());

        assert_eq!(state.status, RunStatus::Completed);
        assert!(state.error_message.is_none());

        let agents: Vec<&str> = state.agent_logs.iter().map(|l| l.agent.as_str()).collect();
        assert_eq!(
            agents,
            vec![
                "forecasting",
                "inventory_analysis",
                "route_optimization",
                "inventory_matching",
                "monitoring"
            ]
        );

        let forecast = state.demand_forecast.as_ref().unwrap();
        assert_eq!(forecast.status, OutcomeStatus::Success);
        assert_eq!(forecast.points.len(), 30);

        let route = state.route_plan.as_ref().unwrap();
        assert_eq!(route.status, OutcomeStatus::Fallback);

        let transfers = state.transfer_plan.as_ref().unwrap();
        assert_eq!(transfers.total_matches, 1);

        assert!(state.alerts.is_some());
        assert_eq!(state.kpi_metrics["agents_executed"], json!(5));
        assert_eq!(state.kpi_metrics["route_efficiency"], json!("0%"));
        assert_eq!(state.kpi_metrics["total_inventory_savings"], json!(22.5));
    }

    #[test]
    fn missing_item_skips_forecasting_and_still_completes() {
        let state = orchestrator(seeded_store()).run(RunGoal::default());

        assert_eq!(state.status, RunStatus::Completed);
        assert!(state.demand_forecast.is_none());
        assert!(state.transfer_plan.is_none());
        assert!(state.alerts.is_some());

        let agents: Vec<&str> = state.agent_logs.iter().map(|l| l.agent.as_str()).collect();
        assert_eq!(agents, vec!["inventory_analysis", "monitoring"]);
    }

    #[test]
    fn route_only_goal_skips_matching() {
        let goal = RunGoal::default().with_route("DEPOT-1", [BranchId::new("BR-1")]);
        let state = orchestrator(seeded_store()).run(goal);

        assert_eq!(state.status, RunStatus::Completed);
        assert!(state.route_plan.is_some());
        assert!(state.transfer_plan.is_none());
        let agents: Vec<&str> = state.agent_logs.iter().map(|l| l.agent.as_str()).collect();
        assert_eq!(
            agents,
            vec!["inventory_analysis", "route_optimization", "monitoring"]
        );
    }

    #[test]
    fn graph_and_linear_agree_on_outputs() {
        let store = seeded_store();
        let graph = orchestrator(store.clone()).run(full_goal());
        let linear = orchestrator(store)
            .with_engine(EngineCapability::Linear)
            .run(full_goal());

        assert_eq!(linear.status, RunStatus::Completed);
        assert_eq!(graph.status, linear.status);
        assert_eq!(graph.demand_forecast, linear.demand_forecast);
        assert_eq!(graph.route_plan, linear.route_plan);
        assert_eq!(
            graph.transfer_plan.as_ref().unwrap().matches,
            linear.transfer_plan.as_ref().unwrap().matches
        );
        assert_eq!(
            graph.alerts.as_ref().unwrap().total_alerts,
            linear.alerts.as_ref().unwrap().total_alerts
        );
        // The linear strategy has no analysis pass-through node.
        assert_eq!(graph.agent_logs.len(), 5);
        assert_eq!(linear.agent_logs.len(), 4);
    }

    #[test]
    fn failing_collaborator_is_recorded_without_aborting() {
        struct BrokenSales;
        impl SalesReader for BrokenSales {
            fn daily_sales(
                &self,
                _item_id: &ItemId,
                _branch_id: Option<&BranchId>,
                _days: u32,
            ) -> AgentResult<Vec<SalesRecord>> {
                Err(AgentError::internal("sales projection offline"))
            }
        }

        let store = seeded_store();
        let orchestrator = WorkflowOrchestrator::new(
            Arc::new(BrokenSales),
            store,
            ForecastEngine::with_defaults(),
            RoutePlanner::without_solver(),
            InventoryRebalancer::new(RebalancePolicy::default()),
            AlertEngine::new(AlertThresholds::default()),
        );

        let state = orchestrator.run(full_goal());

        // The failure is recorded, later steps still ran, and the run
        // finished its summary.
        assert_eq!(state.status, RunStatus::Completed);
        assert!(state
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("sales projection offline")));
        assert!(state.demand_forecast.is_none());
        assert!(state.transfer_plan.is_some());
        assert!(state.alerts.is_some());
        assert_eq!(state.agent_logs[0].status, OutcomeStatus::Error);
    }
}
