//! Stock position classification.

use serde::{Deserialize, Serialize};

use pharmaflow_core::{BranchId, RebalancePolicy};
use pharmaflow_store::InventoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverstockSeverity {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderstockSeverity {
    Critical,
    Warning,
}

/// Classification of one branch's position. Every record maps to exactly one
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockClassification {
    Overstock { excess: f64, severity: OverstockSeverity },
    Understock { deficit: f64, severity: UnderstockSeverity },
    Balanced,
}

/// Classify one record against the policy. First matching rule wins:
///
/// 1. `current > optimal * overstock_trigger` -> Overstock
///    (high above `optimal * overstock_high`, else medium)
/// 2. `current < safe` -> Understock
///    (critical below `safe * understock_critical`, else warning)
/// 3. otherwise Balanced
///
/// `safe` defaults to `optimal * default_safe_fraction` when the record has
/// no explicit safety stock.
pub fn classify(record: &InventoryRecord, policy: &RebalancePolicy) -> StockClassification {
    let current = record.current_stock;
    let optimal = record.optimal_stock;
    let safe = record
        .safe_stock
        .unwrap_or(optimal * policy.default_safe_fraction);

    if current > optimal * policy.overstock_trigger {
        let severity = if current > optimal * policy.overstock_high {
            OverstockSeverity::High
        } else {
            OverstockSeverity::Medium
        };
        StockClassification::Overstock {
            excess: current - optimal,
            severity,
        }
    } else if current < safe {
        let severity = if current < safe * policy.understock_critical {
            UnderstockSeverity::Critical
        } else {
            UnderstockSeverity::Warning
        };
        StockClassification::Understock {
            deficit: safe - current,
            severity,
        }
    } else {
        StockClassification::Balanced
    }
}

/// An overstocked branch with its remaining transferable surplus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverstockPosition {
    pub branch_id: BranchId,
    pub current_stock: f64,
    pub optimal_stock: f64,
    pub excess: f64,
    pub severity: OverstockSeverity,
}

/// An understocked branch with its remaining unmet deficit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderstockPosition {
    pub branch_id: BranchId,
    pub current_stock: f64,
    pub safe_stock: f64,
    pub deficit: f64,
    pub severity: UnderstockSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedPosition {
    pub branch_id: BranchId,
    pub current_stock: f64,
    pub optimal_stock: f64,
}

/// Grouped classification of every branch, preserving record order within
/// each group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub overstock: Vec<OverstockPosition>,
    pub understock: Vec<UnderstockPosition>,
    pub balanced: Vec<BalancedPosition>,
    pub total_overstock_quantity: f64,
    pub total_understock_quantity: f64,
}

/// Classify all records and aggregate the group totals.
pub fn analyze(records: &[InventoryRecord], policy: &RebalancePolicy) -> StockAnalysis {
    let mut analysis = StockAnalysis::default();

    for record in records {
        match classify(record, policy) {
            StockClassification::Overstock { excess, severity } => {
                analysis.total_overstock_quantity += excess;
                analysis.overstock.push(OverstockPosition {
                    branch_id: record.branch_id.clone(),
                    current_stock: record.current_stock,
                    optimal_stock: record.optimal_stock,
                    excess,
                    severity,
                });
            }
            StockClassification::Understock { deficit, severity } => {
                analysis.total_understock_quantity += deficit;
                analysis.understock.push(UnderstockPosition {
                    branch_id: record.branch_id.clone(),
                    current_stock: record.current_stock,
                    safe_stock: record
                        .safe_stock
                        .unwrap_or(record.optimal_stock * policy.default_safe_fraction),
                    deficit,
                    severity,
                });
            }
            StockClassification::Balanced => analysis.balanced.push(BalancedPosition {
                branch_id: record.branch_id.clone(),
                current_stock: record.current_stock,
                optimal_stock: record.optimal_stock,
            }),
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(current: f64, optimal: f64, safe: Option<f64>) -> InventoryRecord {
        let mut r = InventoryRecord::new("BR-1", "item_x", current, optimal);
        r.safe_stock = safe;
        r
    }

    #[test]
    fn classifies_surplus_and_deficit_branches() {
        let policy = RebalancePolicy::default();

        // 200 > 150 = optimal * 1.5 -> high overstock, excess 100.
        let a = classify(&record(200.0, 100.0, Some(20.0)), &policy);
        assert_eq!(
            a,
            StockClassification::Overstock {
                excess: 100.0,
                severity: OverstockSeverity::High
            }
        );

        // 5 < 10 = safe * 0.5 -> critical understock, deficit 15.
        let b = classify(&record(5.0, 100.0, Some(20.0)), &policy);
        assert_eq!(
            b,
            StockClassification::Understock {
                deficit: 15.0,
                severity: UnderstockSeverity::Critical
            }
        );
    }

    #[test]
    fn medium_and_warning_severities() {
        let policy = RebalancePolicy::default();

        // 130 is above 120 but not above 150.
        assert_eq!(
            classify(&record(130.0, 100.0, Some(20.0)), &policy),
            StockClassification::Overstock {
                excess: 30.0,
                severity: OverstockSeverity::Medium
            }
        );

        // 15 is below safe 20 but not below 10.
        assert_eq!(
            classify(&record(15.0, 100.0, Some(20.0)), &policy),
            StockClassification::Understock {
                deficit: 5.0,
                severity: UnderstockSeverity::Warning
            }
        );
    }

    #[test]
    fn safe_stock_defaults_to_fraction_of_optimal() {
        let policy = RebalancePolicy::default();
        // No explicit safe stock: safe = 100 * 0.2 = 20.
        assert!(matches!(
            classify(&record(10.0, 100.0, None), &policy),
            StockClassification::Understock { deficit, .. } if deficit == 10.0
        ));
    }

    #[test]
    fn overstock_wins_over_understock_check() {
        // A pathological record with safe above current but also above the
        // overstock trigger: rule order makes it overstock.
        let policy = RebalancePolicy::default();
        assert!(matches!(
            classify(&record(130.0, 100.0, Some(500.0)), &policy),
            StockClassification::Overstock { .. }
        ));
    }

    proptest! {
        /// Partition: classification is total, and each variant's invariant
        /// holds for the thresholds that selected it.
        #[test]
        fn classification_is_a_total_partition(
            current in 0.0f64..10_000.0,
            optimal in 0.0f64..10_000.0,
            safe in proptest::option::of(0.0f64..5_000.0),
        ) {
            let policy = RebalancePolicy::default();
            let rec = record(current, optimal, safe);
            let effective_safe = safe.unwrap_or(optimal * policy.default_safe_fraction);

            match classify(&rec, &policy) {
                StockClassification::Overstock { excess, .. } => {
                    prop_assert!(current > optimal * policy.overstock_trigger);
                    prop_assert!((excess - (current - optimal)).abs() < 1e-9);
                }
                StockClassification::Understock { deficit, .. } => {
                    prop_assert!(current <= optimal * policy.overstock_trigger);
                    prop_assert!(current < effective_safe);
                    prop_assert!((deficit - (effective_safe - current)).abs() < 1e-9);
                }
                StockClassification::Balanced => {
                    prop_assert!(current <= optimal * policy.overstock_trigger);
                    prop_assert!(current >= effective_safe);
                }
            }
        }
    }
}
