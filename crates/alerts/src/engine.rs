//! Alert generation and ranking.

use std::sync::Arc;

use chrono::Utc;

use pharmaflow_advisory::{insight_or_placeholder, AdvisoryService, NullAdvisory, INSIGHTS_UNAVAILABLE};
use pharmaflow_core::{AlertThresholds, OutcomeStatus};
use pharmaflow_store::InventoryRecord;

use crate::summary::AlertSummary;
use crate::{Alert, AlertOutcome, AlertSeverity, AlertType, RecommendedAction};

/// How many of the top alerts the advisory prompt covers.
const ADVISORY_ALERT_SAMPLE: usize = 10;

/// The alerting engine.
#[derive(Clone)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
    advisory: Arc<dyn AdvisoryService>,
}

impl AlertEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            thresholds,
            advisory: Arc::new(NullAdvisory),
        }
    }

    pub fn with_advisory(mut self, advisory: Arc<dyn AdvisoryService>) -> Self {
        self.advisory = advisory;
        self
    }

    /// Scan all records, rank the alerts, and summarize.
    ///
    /// The optional severity filter applies before the `limit` cut. An empty
    /// scan is a successful outcome with zero alerts.
    pub fn generate(
        &self,
        records: &[InventoryRecord],
        severity_filter: Option<AlertSeverity>,
        limit: usize,
    ) -> AlertOutcome {
        let mut alerts: Vec<Alert> = records
            .iter()
            .flat_map(|record| self.analyze_record(record))
            .collect();

        if let Some(severity) = severity_filter {
            alerts.retain(|a| a.severity == severity);
        }

        // Stable: equal severities keep ascending timestamps.
        alerts.sort_by(|a, b| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then(a.timestamp.cmp(&b.timestamp))
        });
        alerts.truncate(limit);

        let summary = AlertSummary::from_alerts(&alerts);

        let insight = if alerts.is_empty() {
            INSIGHTS_UNAVAILABLE.to_string()
        } else {
            let sample = &alerts[..alerts.len().min(ADVISORY_ALERT_SAMPLE)];
            insight_or_placeholder(self.advisory.as_ref(), &alert_prompt(sample))
        };

        tracing::info!(
            total = alerts.len(),
            critical = summary.critical_count,
            warning = summary.warning_count,
            "alert generation completed"
        );

        AlertOutcome {
            total_alerts: alerts.len(),
            alerts,
            summary,
            insight,
            generated_at: Utc::now(),
            status: OutcomeStatus::Success,
            message: None,
        }
    }

    /// Per-record checks. Stockout-risk and low-stock are mutually exclusive;
    /// the overstock and understock checks are independent of them and of
    /// each other, so one record can raise several alerts.
    fn analyze_record(&self, record: &InventoryRecord) -> Vec<Alert> {
        if !record.current_stock.is_finite() || !record.optimal_stock.is_finite() {
            tracing::warn!(branch_id = %record.branch_id, item_id = %record.item_id, "skipping record with non-finite stock");
            return Vec::new();
        }

        let t = &self.thresholds;
        let mut alerts = Vec::new();

        let current = record.current_stock;
        let optimal = record.optimal_stock;
        let safe = record.safe_stock.unwrap_or_default();

        let avg_daily_demand = match record.demand_forecast {
            Some(demand) if demand > 0.0 => demand / t.demand_window_days,
            _ => t.default_daily_demand,
        };
        let days_until_stockout = if avg_daily_demand > 0.0 {
            current / avg_daily_demand
        } else {
            t.stockout_sentinel_days
        };

        if days_until_stockout <= t.critical_stockout_days {
            alerts.push(Alert {
                severity: AlertSeverity::Critical,
                branch_id: record.branch_id.clone(),
                item_id: record.item_id.clone(),
                alert_type: AlertType::StockoutRisk,
                message: format!(
                    "Critical stockout risk: {days_until_stockout:.1} days remaining"
                ),
                current_stock: current,
                days_until_stockout: Some(days_until_stockout),
                excess_quantity: None,
                deficit_quantity: None,
                recommended_action: RecommendedAction::UrgentOrder,
                timestamp: Utc::now(),
                is_resolved: false,
            });
        } else if days_until_stockout <= t.warning_stockout_days {
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                branch_id: record.branch_id.clone(),
                item_id: record.item_id.clone(),
                alert_type: AlertType::LowStock,
                message: format!("Low stock warning: {days_until_stockout:.1} days remaining"),
                current_stock: current,
                days_until_stockout: Some(days_until_stockout),
                excess_quantity: None,
                deficit_quantity: None,
                recommended_action: RecommendedAction::OrderSoon,
                timestamp: Utc::now(),
                is_resolved: false,
            });
        }

        if current > optimal * t.overstock_multiplier {
            let excess_quantity = current - optimal;
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                branch_id: record.branch_id.clone(),
                item_id: record.item_id.clone(),
                alert_type: AlertType::Overstock,
                message: format!("Overstock: {excess_quantity:.0} units above optimal level"),
                current_stock: current,
                days_until_stockout: None,
                excess_quantity: Some(excess_quantity),
                deficit_quantity: None,
                recommended_action: RecommendedAction::Redistribute,
                timestamp: Utc::now(),
                is_resolved: false,
            });
        }

        if current < safe * t.understock_multiplier {
            let deficit_quantity = safe - current;
            alerts.push(Alert {
                severity: AlertSeverity::Info,
                branch_id: record.branch_id.clone(),
                item_id: record.item_id.clone(),
                alert_type: AlertType::Understock,
                message: format!("Understock: {deficit_quantity:.0} units below safe level"),
                current_stock: current,
                days_until_stockout: None,
                excess_quantity: None,
                deficit_quantity: Some(deficit_quantity),
                recommended_action: RecommendedAction::CheckInventory,
                timestamp: Utc::now(),
                is_resolved: false,
            });
        }

        alerts
    }
}

/// Structured prompt for the advisory collaborator.
fn alert_prompt(alerts: &[Alert]) -> String {
    use std::fmt::Write as _;

    let mut prompt = format!(
        "Inventory alert review over {} alerts. Identify patterns, priority actions, and systemic causes.\n",
        alerts.len()
    );
    for alert in alerts {
        let _ = writeln!(
            prompt,
            "- {:?} at {} ({}): {}",
            alert.severity, alert.branch_id, alert.item_id, alert.message
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaflow_advisory::StaticAdvisory;
    use pharmaflow_core::{BranchId, ItemId};
    use proptest::prelude::*;

    fn engine() -> AlertEngine {
        AlertEngine::new(AlertThresholds::default())
    }

    fn record(branch: &str, current: f64, optimal: f64) -> InventoryRecord {
        InventoryRecord::new(branch, "item_x", current, optimal)
    }

    #[test]
    fn stockout_windows_pick_severity() {
        // No stored forecast: default daily demand of 10 applies.
        let critical = engine().generate(&[record("BR-1", 15.0, 100.0)], None, 50);
        assert_eq!(critical.alerts[0].alert_type, AlertType::StockoutRisk);
        assert_eq!(critical.alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(
            critical.alerts[0].recommended_action,
            RecommendedAction::UrgentOrder
        );

        let warning = engine().generate(&[record("BR-1", 50.0, 100.0)], None, 50);
        assert_eq!(warning.alerts[0].alert_type, AlertType::LowStock);
        assert_eq!(warning.alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn stored_forecast_drives_daily_demand() {
        // 300 units over 30 days -> 10/day; stock 25 -> 2.5 days -> warning.
        let rec = record("BR-1", 25.0, 100.0).with_demand_forecast(300.0);
        let outcome = engine().generate(&[rec], None, 50);
        assert_eq!(outcome.alerts[0].alert_type, AlertType::LowStock);
        let days = outcome.alerts[0].days_until_stockout.unwrap();
        assert!((days - 2.5).abs() < 1e-9);
    }

    #[test]
    fn overstock_and_stockout_checks_are_independent() {
        // Plenty of cover (default demand) but far above optimal.
        let outcome = engine().generate(&[record("BR-1", 400.0, 100.0)], None, 50);
        assert_eq!(outcome.total_alerts, 1);
        assert_eq!(outcome.alerts[0].alert_type, AlertType::Overstock);
        assert_eq!(outcome.alerts[0].excess_quantity, Some(300.0));

        // Deep deficit raises both a stockout alert and an understock note.
        let rec = record("BR-2", 5.0, 100.0).with_safe_stock(20.0);
        let outcome = engine().generate(&[rec], None, 50);
        let types: Vec<AlertType> = outcome.alerts.iter().map(|a| a.alert_type).collect();
        assert_eq!(types, vec![AlertType::StockoutRisk, AlertType::Understock]);
    }

    #[test]
    fn understock_floor_uses_explicit_safe_stock_only() {
        // Without an explicit safety stock the floor is zero and no
        // understock alert can fire.
        let outcome = engine().generate(&[record("BR-1", 30.0, 100.0)], None, 50);
        assert!(outcome
            .alerts
            .iter()
            .all(|a| a.alert_type != AlertType::Understock));
    }

    #[test]
    fn limit_keeps_the_most_severe_alerts() {
        let records = vec![
            record("BR-W", 50.0, 100.0),                       // warning low stock
            record("BR-C", 15.0, 100.0),                       // critical stockout
        ];
        let outcome = engine().generate(&records, None, 1);

        assert_eq!(outcome.total_alerts, 1);
        assert_eq!(outcome.alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(outcome.alerts[0].branch_id, BranchId::new("BR-C"));
    }

    #[test]
    fn severity_filter_applies_before_limit() {
        let records = vec![record("BR-C", 15.0, 100.0), record("BR-W", 50.0, 100.0)];
        let outcome = engine().generate(&records, Some(AlertSeverity::Warning), 10);

        assert_eq!(outcome.total_alerts, 1);
        assert_eq!(outcome.alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn empty_scan_is_successful_with_placeholder_insight() {
        let outcome = engine().generate(&[], None, 10);
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.total_alerts, 0);
        assert_eq!(outcome.insight, INSIGHTS_UNAVAILABLE);
    }

    #[test]
    fn advisory_insight_flows_through() {
        let engine = engine().with_advisory(Arc::new(StaticAdvisory::new("order more amoxicillin")));
        let outcome = engine.generate(&[record("BR-1", 15.0, 100.0)], None, 10);
        assert_eq!(outcome.insight, "order more amoxicillin");
    }

    #[test]
    fn item_ids_flow_into_alerts() {
        let mut rec = record("BR-1", 15.0, 100.0);
        rec.item_id = ItemId::new("amox_250");
        let outcome = engine().generate(&[rec], None, 10);
        assert_eq!(outcome.alerts[0].item_id, ItemId::new("amox_250"));
    }

    proptest! {
        /// Cap and ordering: never more than `limit` alerts, severities
        /// non-decreasing, equal severities in timestamp order.
        #[test]
        fn alerts_are_capped_and_ordered(
            stocks in proptest::collection::vec((0.0f64..500.0, 50.0f64..200.0), 0..25),
            limit in 0usize..30,
        ) {
            let records: Vec<InventoryRecord> = stocks
                .iter()
                .enumerate()
                .map(|(i, (current, optimal))| {
                    record(&format!("BR-{i}"), *current, *optimal).with_safe_stock(optimal * 0.2)
                })
                .collect();

            let outcome = engine().generate(&records, None, limit);
            prop_assert!(outcome.alerts.len() <= limit);

            for pair in outcome.alerts.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.severity.rank() <= b.severity.rank());
                if a.severity.rank() == b.severity.rank() {
                    prop_assert!(a.timestamp <= b.timestamp);
                }
            }
        }
    }
}
