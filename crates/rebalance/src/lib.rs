//! `pharmaflow-rebalance` — inventory rebalancing engine.
//!
//! Given all stock positions of one item across branches and a policy, the
//! engine classifies each branch into exactly one of Overstock, Understock,
//! or Balanced, then greedily proposes profitable transfers from surplus to
//! deficit branches.

pub mod classify;
pub mod matcher;

pub use classify::{
    classify, BalancedPosition, OverstockPosition, OverstockSeverity, StockAnalysis,
    StockClassification, UnderstockPosition, UnderstockSeverity,
};
pub use matcher::{InventoryRebalancer, MatchOutcome, TransferPriority, TransferRecommendation};
