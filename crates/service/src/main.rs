use std::sync::Arc;

use chrono::Utc;

use pharmaflow_alerts::AlertEngine;
use pharmaflow_cache::InMemoryForecastCache;
use pharmaflow_core::{AlertThresholds, BranchId, RebalancePolicy};
use pharmaflow_forecast::ForecastEngine;
use pharmaflow_rebalance::InventoryRebalancer;
use pharmaflow_routing::RoutePlanner;
use pharmaflow_service::SupplyChainService;
use pharmaflow_store::{InMemoryStore, InventoryRecord, SalesRecord};
use pharmaflow_workflow::RunGoal;

/// Demo wiring: in-memory store, no external collaborators, one full run.
#[tokio::main]
async fn main() {
    pharmaflow_observability::init();

    let today = Utc::now().date_naive();
    let sales = (0..60).map(|i| SalesRecord {
        item_id: "para_500".into(),
        branch_id: "BR-NORTH".into(),
        date: today - chrono::Duration::days(i),
        quantity: 18.0 + (i % 7) as f64,
    });

    let store = Arc::new(
        InMemoryStore::new()
            .with_inventory([
                InventoryRecord::new("BR-NORTH", "para_500", 260.0, 100.0).with_safe_stock(20.0),
                InventoryRecord::new("BR-SOUTH", "para_500", 6.0, 100.0).with_safe_stock(20.0),
                InventoryRecord::new("BR-EAST", "para_500", 90.0, 100.0).with_safe_stock(20.0),
            ])
            .with_sales(sales),
    );

    let service = SupplyChainService::new(
        store.clone(),
        store,
        ForecastEngine::with_defaults(),
        RoutePlanner::without_solver(),
        InventoryRebalancer::new(RebalancePolicy::default()),
        AlertEngine::new(AlertThresholds::default()),
        Arc::new(InMemoryForecastCache::new()),
    );

    let goal = RunGoal::for_item("para_500").with_route(
        "DEPOT-MAIN",
        [BranchId::new("BR-NORTH"), BranchId::new("BR-SOUTH")],
    );

    let state = service
        .execute_workflow(goal)
        .await
        .expect("workflow run failed");

    println!(
        "{}",
        serde_json::to_string_pretty(&state).expect("run state serializes")
    );
}
