//! `pharmaflow-cache` — time-bound memoization for forecast requests.
//!
//! A narrow cache service (`get` / `put` / `evict`) keyed by deterministic
//! request fingerprints, with lazy TTL eviction. The in-memory implementation
//! is process-wide shared state; concurrent identical requests may both miss
//! and both recompute, and the last writer wins. That costs wasted work,
//! never consistency.

pub mod fingerprint;
pub mod memory;

pub use fingerprint::Fingerprint;
pub use memory::InMemoryForecastCache;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// One cached result with its expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub result: JsonValue,
    pub expires_at: DateTime<Utc>,
}

/// Narrow cache boundary, swappable for a distributed implementation without
/// touching callers.
pub trait CacheService: Send + Sync {
    /// A hit only while the entry is unexpired; expired entries are treated
    /// as misses and evicted lazily.
    fn get(&self, fingerprint: &Fingerprint) -> Option<JsonValue>;

    fn put(&self, fingerprint: Fingerprint, result: JsonValue);

    fn evict(&self, fingerprint: &Fingerprint);
}
