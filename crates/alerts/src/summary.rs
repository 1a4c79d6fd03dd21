//! Alert aggregation.

use serde::{Deserialize, Serialize};

use pharmaflow_core::BranchId;

use crate::{Alert, AlertSeverity, AlertType};

/// How many branches the summary surfaces.
const TOP_BRANCHES: usize = 5;

/// Aggregate view over a ranked alert list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// Up to five branches with the most alerts, descending; ties keep
    /// first-seen order.
    pub top_affected_branches: Vec<(BranchId, usize)>,
    /// Distinct alert types present, in first-seen order.
    pub alert_types: Vec<AlertType>,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let critical_count = alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count();
        let warning_count = alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Warning)
            .count();
        let info_count = alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Info)
            .count();

        // First-seen order, so the stable sort below keeps ties deterministic.
        let mut branch_counts: Vec<(BranchId, usize)> = Vec::new();
        let mut alert_types: Vec<AlertType> = Vec::new();
        for alert in alerts {
            match branch_counts.iter_mut().find(|(b, _)| b == &alert.branch_id) {
                Some((_, count)) => *count += 1,
                None => branch_counts.push((alert.branch_id.clone(), 1)),
            }
            if !alert_types.contains(&alert.alert_type) {
                alert_types.push(alert.alert_type);
            }
        }
        branch_counts.sort_by(|a, b| b.1.cmp(&a.1));
        branch_counts.truncate(TOP_BRANCHES);

        Self {
            total_alerts: alerts.len(),
            critical_count,
            warning_count,
            info_count,
            top_affected_branches: branch_counts,
            alert_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pharmaflow_core::ItemId;

    use crate::RecommendedAction;

    fn alert(branch: &str, severity: AlertSeverity, alert_type: AlertType) -> Alert {
        Alert {
            severity,
            branch_id: BranchId::new(branch),
            item_id: ItemId::new("item_x"),
            alert_type,
            message: String::new(),
            current_stock: 0.0,
            days_until_stockout: None,
            excess_quantity: None,
            deficit_quantity: None,
            recommended_action: RecommendedAction::CheckInventory,
            timestamp: Utc::now(),
            is_resolved: false,
        }
    }

    #[test]
    fn counts_and_types_aggregate() {
        let alerts = vec![
            alert("BR-1", AlertSeverity::Critical, AlertType::StockoutRisk),
            alert("BR-1", AlertSeverity::Warning, AlertType::Overstock),
            alert("BR-2", AlertSeverity::Info, AlertType::Understock),
            alert("BR-2", AlertSeverity::Warning, AlertType::Overstock),
        ];

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.total_alerts, 4);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.warning_count, 2);
        assert_eq!(summary.info_count, 1);
        assert_eq!(
            summary.alert_types,
            vec![AlertType::StockoutRisk, AlertType::Overstock, AlertType::Understock]
        );
    }

    #[test]
    fn top_branches_are_capped_and_stable_on_ties() {
        let mut alerts = Vec::new();
        for branch in ["B1", "B2", "B3", "B4", "B5", "B6"] {
            alerts.push(alert(branch, AlertSeverity::Warning, AlertType::Overstock));
        }
        // B6 pulls ahead of the rest.
        alerts.push(alert("B6", AlertSeverity::Warning, AlertType::Overstock));

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.top_affected_branches.len(), 5);
        assert_eq!(summary.top_affected_branches[0], (BranchId::new("B6"), 2));
        // Remaining ties keep first-seen order.
        assert_eq!(summary.top_affected_branches[1], (BranchId::new("B1"), 1));
        assert_eq!(summary.top_affected_branches[4], (BranchId::new("B4"), 1));
    }
}
