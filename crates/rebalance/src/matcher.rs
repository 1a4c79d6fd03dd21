//! Greedy transfer matching.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pharmaflow_advisory::{insight_or_placeholder, AdvisoryService, NullAdvisory};
use pharmaflow_core::{AgentError, AgentResult, BranchId, ItemId, OutcomeStatus, RebalancePolicy};
use pharmaflow_store::InventoryRecord;

use crate::classify::{analyze, StockAnalysis, UnderstockSeverity};

/// Transfer urgency. Ordering rank: critical < high < medium < low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl TransferPriority {
    pub fn rank(&self) -> u8 {
        match self {
            TransferPriority::Critical => 0,
            TransferPriority::High => 1,
            TransferPriority::Medium => 2,
            TransferPriority::Low => 3,
        }
    }
}

/// One proposed stock transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecommendation {
    pub from_branch: BranchId,
    pub to_branch: BranchId,
    pub item_id: ItemId,
    pub quantity: f64,
    pub transfer_cost: f64,
    pub expected_savings: f64,
    pub priority: TransferPriority,
}

/// Structured rebalancing result. `no_data` and `error` are normal outcomes,
/// never raised to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub matches: Vec<TransferRecommendation>,
    pub total_matches: usize,
    pub total_savings: f64,
    #[serde(default)]
    pub analysis: Option<StockAnalysis>,
    /// Advisory insight, or the fixed placeholder when no generator is
    /// configured.
    pub insight: String,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl MatchOutcome {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            total_matches: 0,
            total_savings: 0.0,
            analysis: None,
            insight: String::new(),
            status: OutcomeStatus::NoData,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            total_matches: 0,
            total_savings: 0.0,
            analysis: None,
            insight: String::new(),
            status: OutcomeStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// The rebalancing engine.
#[derive(Clone)]
pub struct InventoryRebalancer {
    policy: RebalancePolicy,
    advisory: Arc<dyn AdvisoryService>,
}

impl InventoryRebalancer {
    pub fn new(policy: RebalancePolicy) -> Self {
        Self {
            policy,
            advisory: Arc::new(NullAdvisory),
        }
    }

    pub fn with_advisory(mut self, advisory: Arc<dyn AdvisoryService>) -> Self {
        self.advisory = advisory;
        self
    }

    pub fn with_policy(mut self, policy: RebalancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RebalancePolicy {
        &self.policy
    }

    /// Classify the item's positions and propose profitable transfers.
    pub fn find_matches(&self, item_id: &ItemId, records: &[InventoryRecord]) -> MatchOutcome {
        if records.is_empty() {
            tracing::warn!(item_id = %item_id, "no inventory records to rebalance");
            return MatchOutcome::no_data("no inventory data found");
        }

        match self.try_match(item_id, records) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(item_id = %item_id, error = %err, "inventory matching failed");
                MatchOutcome::error(err.to_string())
            }
        }
    }

    fn try_match(&self, item_id: &ItemId, records: &[InventoryRecord]) -> AgentResult<MatchOutcome> {
        for record in records {
            if !record.current_stock.is_finite() || !record.optimal_stock.is_finite() {
                return Err(AgentError::internal(format!(
                    "non-finite stock figures for branch {}",
                    record.branch_id
                )));
            }
        }

        let analysis = analyze(records, &self.policy);
        let matches = self.generate_transfers(item_id, &analysis);
        let total_savings = matches.iter().map(|t| t.expected_savings).sum();

        let insight = insight_or_placeholder(
            self.advisory.as_ref(),
            &rebalance_prompt(&analysis, &self.policy),
        );

        tracing::info!(
            item_id = %item_id,
            matches = matches.len(),
            total_savings,
            "inventory matching completed"
        );

        Ok(MatchOutcome {
            total_matches: matches.len(),
            matches,
            total_savings,
            analysis: Some(analysis),
            insight,
            status: OutcomeStatus::Success,
            message: None,
        })
    }

    /// Greedy pairing: walk understocked branches in their given order, then
    /// overstocked branches in their given order, transferring
    /// `min(excess, deficit)` whenever the move is profitable. Remainders are
    /// consumed in place so no branch is double-counted, and generation halts
    /// at the configured cap.
    fn generate_transfers(
        &self,
        item_id: &ItemId,
        analysis: &StockAnalysis,
    ) -> Vec<TransferRecommendation> {
        let mut overstock = analysis.overstock.clone();
        let mut understock = analysis.understock.clone();
        let mut transfers = Vec::new();

        'pairing: for under in understock.iter_mut() {
            for over in overstock.iter_mut() {
                if over.excess <= 0.0 || under.deficit <= 0.0 {
                    continue;
                }

                let quantity = over.excess.min(under.deficit);
                let transfer_cost = quantity * self.policy.transfer_cost_per_unit;
                let holding_cost_saved = quantity * self.policy.holding_cost_per_unit;
                let expected_savings = holding_cost_saved - transfer_cost;

                if expected_savings <= 0.0 {
                    continue;
                }

                transfers.push(TransferRecommendation {
                    from_branch: over.branch_id.clone(),
                    to_branch: under.branch_id.clone(),
                    item_id: item_id.clone(),
                    quantity,
                    transfer_cost,
                    expected_savings,
                    priority: if under.severity == UnderstockSeverity::Critical {
                        TransferPriority::High
                    } else {
                        TransferPriority::Medium
                    },
                });

                over.excess -= quantity;
                under.deficit -= quantity;

                if transfers.len() >= self.policy.max_transfers {
                    break 'pairing;
                }
            }
        }

        // Stable order: priority rank, then biggest savings first.
        transfers.sort_by(|a, b| {
            a.priority
                .rank()
                .cmp(&b.priority.rank())
                .then(b.expected_savings.total_cmp(&a.expected_savings))
        });
        transfers.truncate(self.policy.max_transfers);
        transfers
    }
}

/// Structured prompt for the advisory collaborator.
fn rebalance_prompt(analysis: &StockAnalysis, policy: &RebalancePolicy) -> String {
    use std::fmt::Write as _;

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Inventory rebalancing review. Total overstock: {:.0} units across {} branches; \
         total understock: {:.0} units across {} branches. Safety cover target: {} days.",
        analysis.total_overstock_quantity,
        analysis.overstock.len(),
        analysis.total_understock_quantity,
        analysis.understock.len(),
        policy.safe_days,
    );
    for over in &analysis.overstock {
        let _ = writeln!(
            prompt,
            "- surplus at {}: {:.0} units above optimal {:.0}",
            over.branch_id, over.excess, over.optimal_stock
        );
    }
    for under in &analysis.understock {
        let _ = writeln!(
            prompt,
            "- deficit at {}: {:.0} units below safety {:.0}",
            under.branch_id, under.deficit, under.safe_stock
        );
    }
    prompt.push_str("Recommend transfer pairs, quantities, and risks.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaflow_advisory::{StaticAdvisory, INSIGHTS_UNAVAILABLE};
    use proptest::prelude::*;

    fn rebalancer() -> InventoryRebalancer {
        InventoryRebalancer::new(RebalancePolicy::default())
    }

    fn record(branch: &str, current: f64, optimal: f64, safe: Option<f64>) -> InventoryRecord {
        let mut r = InventoryRecord::new(branch, "item_x", current, optimal);
        r.safe_stock = safe;
        r
    }

    #[test]
    fn surplus_covers_critical_deficit_with_one_transfer() {
        let records = vec![
            record("A", 200.0, 100.0, Some(20.0)),
            record("B", 5.0, 100.0, Some(20.0)),
        ];

        let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &records);

        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.total_matches, 1);
        let t = &outcome.matches[0];
        assert_eq!(t.from_branch, BranchId::new("A"));
        assert_eq!(t.to_branch, BranchId::new("B"));
        assert_eq!(t.quantity, 15.0);
        assert_eq!(t.transfer_cost, 7.5);
        assert_eq!(t.expected_savings, 22.5);
        assert_eq!(t.priority, TransferPriority::High);
        assert_eq!(outcome.total_savings, 22.5);
    }

    #[test]
    fn empty_records_report_no_data() {
        let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &[]);
        assert_eq!(outcome.status, OutcomeStatus::NoData);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn non_finite_stock_reports_error_outcome() {
        let records = vec![record("A", f64::NAN, 100.0, None)];
        let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &records);
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert!(outcome.message.is_some());
    }

    #[test]
    fn remainders_are_consumed_across_pairs() {
        // One big surplus split across two deficits.
        let records = vec![
            record("SRC", 300.0, 100.0, Some(20.0)), // excess 200
            record("D1", 5.0, 100.0, Some(20.0)),    // deficit 15
            record("D2", 0.0, 100.0, Some(50.0)),    // deficit 50
        ];

        let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &records);
        assert_eq!(outcome.total_matches, 2);

        let to_d1: f64 = outcome
            .matches
            .iter()
            .filter(|t| t.to_branch == BranchId::new("D1"))
            .map(|t| t.quantity)
            .sum();
        let to_d2: f64 = outcome
            .matches
            .iter()
            .filter(|t| t.to_branch == BranchId::new("D2"))
            .map(|t| t.quantity)
            .sum();
        assert_eq!(to_d1, 15.0);
        assert_eq!(to_d2, 50.0);

        let from_src: f64 = outcome.matches.iter().map(|t| t.quantity).sum();
        assert!(from_src <= 200.0);
    }

    #[test]
    fn transfer_cap_holds_with_many_branches() {
        let mut records = vec![record("SRC", 100_000.0, 100.0, Some(20.0))];
        for i in 0..30 {
            records.push(record(&format!("D{i}"), 0.0, 100.0, Some(20.0)));
        }

        let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &records);
        assert_eq!(outcome.total_matches, 10);
        assert_eq!(outcome.matches.len(), 10);
    }

    #[test]
    fn advisory_insight_degrades_to_placeholder() {
        let records = vec![record("A", 200.0, 100.0, Some(20.0))];
        let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &records);
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.insight, INSIGHTS_UNAVAILABLE);

        let with_advisory = rebalancer().with_advisory(Arc::new(StaticAdvisory::new("move it")));
        let outcome = with_advisory.find_matches(&ItemId::new("item_x"), &records);
        assert_eq!(outcome.insight, "move it");
    }

    prop_compose! {
        fn arb_records()(
            overs in proptest::collection::vec((150.0f64..400.0, 50.0f64..100.0), 0..6),
            unders in proptest::collection::vec((0.0f64..10.0, 40.0f64..80.0), 0..6),
        ) -> Vec<InventoryRecord> {
            let mut records = Vec::new();
            for (i, (current, optimal)) in overs.into_iter().enumerate() {
                records.push(record(&format!("OV{i}"), current, optimal, Some(optimal * 0.3)));
            }
            for (i, (current, safe)) in unders.into_iter().enumerate() {
                records.push(record(&format!("UN{i}"), current, safe * 2.0, Some(safe)));
            }
            records
        }
    }

    proptest! {
        /// Transfer soundness: per-branch shipped/received quantities never
        /// exceed the branch's excess/deficit at generation time, savings are
        /// strictly positive, the cap holds, and ordering is by priority rank
        /// then savings descending.
        #[test]
        fn transfers_are_sound_capped_and_ordered(records in arb_records()) {
            let policy = RebalancePolicy::default();
            let outcome = rebalancer().find_matches(&ItemId::new("item_x"), &records);
            prop_assume!(outcome.status == OutcomeStatus::Success);

            prop_assert!(outcome.matches.len() <= policy.max_transfers);

            let analysis = crate::classify::analyze(&records, &policy);
            for over in &analysis.overstock {
                let shipped: f64 = outcome.matches.iter()
                    .filter(|t| t.from_branch == over.branch_id)
                    .map(|t| t.quantity)
                    .sum();
                prop_assert!(shipped <= over.excess + 1e-9);
            }
            for under in &analysis.understock {
                let received: f64 = outcome.matches.iter()
                    .filter(|t| t.to_branch == under.branch_id)
                    .map(|t| t.quantity)
                    .sum();
                prop_assert!(received <= under.deficit + 1e-9);
            }

            for t in &outcome.matches {
                prop_assert!(t.quantity > 0.0);
                prop_assert!(t.expected_savings > 0.0);
            }

            for pair in outcome.matches.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.priority.rank() <= b.priority.rank());
                if a.priority.rank() == b.priority.rank() {
                    prop_assert!(a.expected_savings >= b.expected_savings);
                }
            }
        }
    }
}
