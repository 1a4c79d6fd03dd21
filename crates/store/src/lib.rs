//! `pharmaflow-store` — read-only document-store boundary.
//!
//! The persistent store's query engine is an external collaborator; this
//! crate exposes the narrow read interfaces the decision layer consumes
//! (inventory positions, sales history, drug metadata) plus an in-memory
//! implementation for tests and single-process wiring. The decision layer
//! never writes through these interfaces.

pub mod memory;
pub mod records;

pub use memory::InMemoryStore;
pub use records::{DrugInfo, InventoryRecord, SalesRecord};

use pharmaflow_core::{AgentResult, BranchId, ItemId};

/// Read access to current inventory positions.
pub trait InventoryReader: Send + Sync {
    /// All positions of one item across branches (case-insensitive item match).
    fn records_for_item(&self, item_id: &ItemId) -> AgentResult<Vec<InventoryRecord>>;

    /// Every recorded position, all items and branches.
    fn all_records(&self) -> AgentResult<Vec<InventoryRecord>>;
}

/// Read access to historical sales.
pub trait SalesReader: Send + Sync {
    /// Daily sales for an item over the trailing `days`, optionally scoped to
    /// one branch. Multiple entries per day are allowed; callers aggregate.
    fn daily_sales(
        &self,
        item_id: &ItemId,
        branch_id: Option<&BranchId>,
        days: u32,
    ) -> AgentResult<Vec<SalesRecord>>;
}

/// Read access to drug master data.
pub trait DrugCatalog: Send + Sync {
    fn drug(&self, item_id: &ItemId) -> AgentResult<Option<DrugInfo>>;
}
