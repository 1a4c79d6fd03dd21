//! Record types read from the document store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pharmaflow_core::{BranchId, ItemId};

/// One branch's stock position for one item. Read-only within the decision
/// layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub branch_id: BranchId,
    pub item_id: ItemId,
    pub current_stock: f64,
    pub optimal_stock: f64,
    /// Explicit safety stock; when absent, policies derive it from
    /// `optimal_stock`.
    #[serde(default)]
    pub safe_stock: Option<f64>,
    /// Stored 30-day demand figure, when a forecast has been persisted for
    /// this position.
    #[serde(default)]
    pub demand_forecast: Option<f64>,
}

impl InventoryRecord {
    pub fn new(
        branch_id: impl Into<BranchId>,
        item_id: impl Into<ItemId>,
        current_stock: f64,
        optimal_stock: f64,
    ) -> Self {
        Self {
            branch_id: branch_id.into(),
            item_id: item_id.into(),
            current_stock,
            optimal_stock,
            safe_stock: None,
            demand_forecast: None,
        }
    }

    pub fn with_safe_stock(mut self, safe_stock: f64) -> Self {
        self.safe_stock = Some(safe_stock);
        self
    }

    pub fn with_demand_forecast(mut self, demand_forecast: f64) -> Self {
        self.demand_forecast = Some(demand_forecast);
        self
    }
}

/// One day's sales of an item at a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub item_id: ItemId,
    pub branch_id: BranchId,
    pub date: NaiveDate,
    pub quantity: f64,
}

/// Drug master-data entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugInfo {
    pub item_id: ItemId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}
