//! Business-heuristic configuration.
//!
//! The multipliers and windows here are operational heuristics inherited from
//! the business rules; they are carried as configuration fields (not literals
//! at use sites) and the defaults are the canonical values.

use serde::{Deserialize, Serialize};

/// Policy driving stock classification and transfer matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancePolicy {
    /// Days of demand the safety stock should cover.
    pub safe_days: u32,
    /// Overstock once `current > optimal * overstock_trigger`.
    pub overstock_trigger: f64,
    /// Overstock severity becomes high once `current > optimal * overstock_high`.
    pub overstock_high: f64,
    /// Understock severity becomes critical once `current < safe * understock_critical`.
    pub understock_critical: f64,
    /// Safety stock default as a fraction of optimal, when no explicit
    /// `safe_stock` is recorded.
    pub default_safe_fraction: f64,
    /// Cost of moving one unit between branches (USD).
    pub transfer_cost_per_unit: f64,
    /// Monthly holding cost saved per unit moved off an overstocked branch (USD).
    pub holding_cost_per_unit: f64,
    /// Hard cap on emitted transfer recommendations.
    pub max_transfers: usize,
}

impl Default for RebalancePolicy {
    fn default() -> Self {
        Self {
            safe_days: 14,
            overstock_trigger: 1.2,
            overstock_high: 1.5,
            understock_critical: 0.5,
            default_safe_fraction: 0.2,
            transfer_cost_per_unit: 0.5,
            holding_cost_per_unit: 2.0,
            max_transfers: 10,
        }
    }
}

impl RebalancePolicy {
    pub fn with_safe_days(mut self, safe_days: u32) -> Self {
        self.safe_days = safe_days;
        self
    }
}

/// Thresholds driving alert generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Stockout horizon (days) below which an alert is CRITICAL.
    pub critical_stockout_days: f64,
    /// Stockout horizon (days) below which an alert is WARNING.
    pub warning_stockout_days: f64,
    /// Overstock once `current > optimal * overstock_multiplier`.
    pub overstock_multiplier: f64,
    /// Understock once `current < safe * understock_multiplier`.
    pub understock_multiplier: f64,
    /// Daily demand assumed when no forecast figure is recorded.
    pub default_daily_demand: f64,
    /// Sentinel stockout horizon when daily demand is zero.
    pub stockout_sentinel_days: f64,
    /// Window (days) over which the stored demand figure is spread.
    pub demand_window_days: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_stockout_days: 2.0,
            warning_stockout_days: 7.0,
            overstock_multiplier: 1.5,
            understock_multiplier: 0.3,
            default_daily_demand: 10.0,
            stockout_sentinel_days: 999.0,
            demand_window_days: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_canonical_values() {
        let policy = RebalancePolicy::default();
        assert_eq!(policy.safe_days, 14);
        assert_eq!(policy.overstock_trigger, 1.2);
        assert_eq!(policy.max_transfers, 10);

        let thresholds = AlertThresholds::default();
        assert_eq!(thresholds.critical_stockout_days, 2.0);
        assert_eq!(thresholds.warning_stockout_days, 7.0);
    }
}
