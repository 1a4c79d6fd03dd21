//! The service aggregate.

use std::sync::Arc;
use std::time::Duration;

use pharmaflow_alerts::{AlertEngine, AlertOutcome, AlertSeverity};
use pharmaflow_cache::{CacheService, Fingerprint};
use pharmaflow_core::{BranchId, ItemId, OutcomeStatus, RebalancePolicy};
use pharmaflow_forecast::{DemandSeries, ForecastEngine, ForecastOutcome, ForecastRequest};
use pharmaflow_rebalance::{InventoryRebalancer, MatchOutcome};
use pharmaflow_routing::{RouteOutcome, RoutePlanner, RouteRequest};
use pharmaflow_store::{InventoryReader, SalesReader};
use pharmaflow_workflow::{EngineCapability, RunGoal, RunState, WorkflowOrchestrator};

use crate::budgets::TimeoutBudgets;
use crate::error::ServiceError;

/// Trailing sales window fed into forecasting.
const SALES_HISTORY_DAYS: u32 = 365;

/// Owns the decision components and exposes the five core operations.
#[derive(Clone)]
pub struct SupplyChainService {
    sales: Arc<dyn SalesReader>,
    inventory: Arc<dyn InventoryReader>,
    forecast: ForecastEngine,
    router: RoutePlanner,
    rebalancer: InventoryRebalancer,
    alerts: AlertEngine,
    orchestrator: WorkflowOrchestrator,
    cache: Arc<dyn CacheService>,
    budgets: TimeoutBudgets,
}

impl SupplyChainService {
    pub fn new(
        sales: Arc<dyn SalesReader>,
        inventory: Arc<dyn InventoryReader>,
        forecast: ForecastEngine,
        router: RoutePlanner,
        rebalancer: InventoryRebalancer,
        alerts: AlertEngine,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        let orchestrator = WorkflowOrchestrator::new(
            sales.clone(),
            inventory.clone(),
            forecast.clone(),
            router.clone(),
            rebalancer.clone(),
            alerts.clone(),
        );

        Self {
            sales,
            inventory,
            forecast,
            router,
            rebalancer,
            alerts,
            orchestrator,
            cache,
            budgets: TimeoutBudgets::default(),
        }
    }

    pub fn with_budgets(mut self, budgets: TimeoutBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_engine(mut self, engine: EngineCapability) -> Self {
        self.orchestrator = self.orchestrator.with_engine(engine);
        self
    }

    /// Forecast demand for an item, memoized by request fingerprint.
    pub async fn forecast_demand(
        &self,
        request: ForecastRequest,
    ) -> Result<ForecastOutcome, ServiceError> {
        let fingerprint = match Fingerprint::of(&request) {
            Ok(fingerprint) => Some(fingerprint),
            Err(err) => {
                tracing::warn!(error = %err, "request not fingerprintable, bypassing cache");
                None
            }
        };

        if let Some(fingerprint) = &fingerprint {
            if let Some(value) = self.cache.get(fingerprint) {
                match serde_json::from_value::<ForecastOutcome>(value) {
                    Ok(outcome) => {
                        tracing::info!(fingerprint = %fingerprint, "serving cached forecast");
                        return Ok(outcome);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "cached forecast unreadable, evicting");
                        self.cache.evict(fingerprint);
                    }
                }
            }
        }

        let sales = self.sales.clone();
        let engine = self.forecast.clone();
        let req = request.clone();
        let outcome = self
            .run_blocking("forecast", self.budgets.forecast_secs, move || {
                compute_forecast(sales.as_ref(), &engine, &req)
            })
            .await?;

        // Only completed (non-timeout) results reach the cache.
        if let Some(fingerprint) = fingerprint {
            match serde_json::to_value(&outcome) {
                Ok(value) => self.cache.put(fingerprint, value),
                Err(err) => tracing::warn!(error = %err, "forecast outcome not cacheable"),
            }
        }
        Ok(outcome)
    }

    /// Plan a delivery route from a depot through a destination set.
    pub async fn optimize_route(
        &self,
        request: RouteRequest,
    ) -> Result<RouteOutcome, ServiceError> {
        let router = self.router.clone();
        self.run_blocking("routing", self.budgets.routing_secs, move || {
            router.plan(&request)
        })
        .await
    }

    /// Propose stock transfers for one item, optionally under a caller
    /// policy.
    pub async fn match_inventory(
        &self,
        item_id: ItemId,
        policy: Option<RebalancePolicy>,
    ) -> Result<MatchOutcome, ServiceError> {
        let inventory = self.inventory.clone();
        let rebalancer = match policy {
            Some(policy) => self.rebalancer.clone().with_policy(policy),
            None => self.rebalancer.clone(),
        };

        self.run_blocking("rebalancing", self.budgets.rebalance_secs, move || {
            match inventory.records_for_item(&item_id) {
                Ok(records) => rebalancer.find_matches(&item_id, &records),
                Err(err) => {
                    let mut outcome = MatchOutcome::error(err.to_string());
                    outcome.status = OutcomeStatus::from_error(&err);
                    outcome
                }
            }
        })
        .await
    }

    /// Rank current operational alerts.
    pub async fn list_alerts(
        &self,
        severity: Option<AlertSeverity>,
        limit: usize,
    ) -> Result<AlertOutcome, ServiceError> {
        let inventory = self.inventory.clone();
        let alerts = self.alerts.clone();

        self.run_blocking("alerting", self.budgets.alerts_secs, move || {
            match inventory.all_records() {
                Ok(records) => alerts.generate(&records, severity, limit),
                Err(err) => {
                    let mut outcome = AlertOutcome::error(err.to_string());
                    outcome.status = OutcomeStatus::from_error(&err);
                    outcome
                }
            }
        })
        .await
    }

    /// Run the full orchestrated workflow for a goal.
    pub async fn execute_workflow(&self, goal: RunGoal) -> Result<RunState, ServiceError> {
        let orchestrator = self.orchestrator.clone();
        self.run_blocking("workflow", self.budgets.workflow_secs, move || {
            orchestrator.run(goal)
        })
        .await
    }

    async fn run_blocking<T, F>(
        &self,
        operation: &'static str,
        budget_secs: u64,
        f: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::task::spawn_blocking(f);
        match tokio::time::timeout(Duration::from_secs(budget_secs), task).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(join_err)) => Err(ServiceError::TaskFailed(join_err.to_string())),
            Err(_) => {
                tracing::error!(operation, budget_secs, "operation timed out");
                Err(ServiceError::Timeout {
                    operation,
                    budget_secs,
                })
            }
        }
    }
}

fn compute_forecast(
    sales: &dyn SalesReader,
    engine: &ForecastEngine,
    request: &ForecastRequest,
) -> ForecastOutcome {
    let branch_scope = (request.entity_type == "branch")
        .then(|| request.entity_id.clone())
        .flatten()
        .map(BranchId::new);

    match sales.daily_sales(&request.item_id, branch_scope.as_ref(), SALES_HISTORY_DAYS) {
        Ok(records) => {
            let series = DemandSeries::from_daily(records.iter().map(|r| (r.date, r.quantity)));
            engine.run(&request.model, &series, request.horizon_days)
        }
        Err(err) => {
            let mut outcome = ForecastOutcome::error(err.to_string());
            outcome.status = OutcomeStatus::from_error(&err);
            outcome
        }
    }
}
