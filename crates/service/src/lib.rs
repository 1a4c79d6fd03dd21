//! `pharmaflow-service` — the core operations surface.
//!
//! Five operations mirror the decision layer's capabilities: forecast demand,
//! optimize a route, match inventory, list alerts, execute the full workflow.
//! A thin transport layer (out of scope here) maps these 1:1 onto its
//! endpoints.
//!
//! Every collaborator-facing call runs on the blocking pool under an explicit
//! per-operation timeout budget. A timeout ends the request with
//! [`ServiceError::Timeout`] before any shared state is touched: in
//! particular, a timed-out forecast never reaches the cache.

pub mod budgets;
pub mod error;
pub mod service;

pub use budgets::TimeoutBudgets;
pub use error::ServiceError;
pub use service::SupplyChainService;
