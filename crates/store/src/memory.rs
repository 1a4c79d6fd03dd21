//! In-memory store implementation (tests and single-process wiring).

use chrono::Utc;

use pharmaflow_core::{AgentResult, BranchId, ItemId};

use crate::records::{DrugInfo, InventoryRecord, SalesRecord};
use crate::{DrugCatalog, InventoryReader, SalesReader};

/// Vec-backed store holding all three collections.
///
/// Lookups match item codes case-insensitively, mirroring the backing store's
/// normalized index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inventory: Vec<InventoryRecord>,
    sales: Vec<SalesRecord>,
    drugs: Vec<DrugInfo>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(mut self, records: impl IntoIterator<Item = InventoryRecord>) -> Self {
        self.inventory.extend(records);
        self
    }

    pub fn with_sales(mut self, records: impl IntoIterator<Item = SalesRecord>) -> Self {
        self.sales.extend(records);
        self
    }

    pub fn with_drugs(mut self, drugs: impl IntoIterator<Item = DrugInfo>) -> Self {
        self.drugs.extend(drugs);
        self
    }
}

impl InventoryReader for InMemoryStore {
    fn records_for_item(&self, item_id: &ItemId) -> AgentResult<Vec<InventoryRecord>> {
        let wanted = item_id.normalized();
        let records: Vec<InventoryRecord> = self
            .inventory
            .iter()
            .filter(|r| r.item_id.normalized() == wanted)
            .cloned()
            .collect();
        tracing::debug!(item_id = %item_id, count = records.len(), "inventory lookup");
        Ok(records)
    }

    fn all_records(&self) -> AgentResult<Vec<InventoryRecord>> {
        Ok(self.inventory.clone())
    }
}

impl SalesReader for InMemoryStore {
    fn daily_sales(
        &self,
        item_id: &ItemId,
        branch_id: Option<&BranchId>,
        days: u32,
    ) -> AgentResult<Vec<SalesRecord>> {
        let wanted = item_id.normalized();
        let cutoff = Utc::now().date_naive() - chrono::Duration::days(i64::from(days));
        Ok(self
            .sales
            .iter()
            .filter(|r| r.item_id.normalized() == wanted)
            .filter(|r| branch_id.is_none_or(|b| &r.branch_id == b))
            .filter(|r| r.date >= cutoff)
            .cloned()
            .collect())
    }
}

impl DrugCatalog for InMemoryStore {
    fn drug(&self, item_id: &ItemId) -> AgentResult<Option<DrugInfo>> {
        let wanted = item_id.normalized();
        Ok(self
            .drugs
            .iter()
            .find(|d| d.item_id.normalized() == wanted)
            .cloned())
    }
}
