//! In-memory, process-wide forecast cache.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value as JsonValue;

use crate::fingerprint::Fingerprint;
use crate::{CacheEntry, CacheService};

/// Default validity window for cached forecasts.
const DEFAULT_TTL_MINUTES: i64 = 60;

/// `Mutex<HashMap>`-backed cache with lazy TTL eviction.
///
/// Shared across concurrent runs. Two runs computing the same fingerprint at
/// once may both miss and both `put`; the second overwrite is harmless.
#[derive(Debug)]
pub struct InMemoryForecastCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryForecastCache {
    pub fn new() -> Self {
        Self::with_ttl_minutes(DEFAULT_TTL_MINUTES)
    }

    pub fn with_ttl_minutes(minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(minutes),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clock-parameterized lookup; `get` passes the real clock.
    fn get_at(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> Option<JsonValue> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(fingerprint.as_str()) {
            Some(entry) if now < entry.expires_at => {
                tracing::debug!(fingerprint = %fingerprint, "forecast cache hit");
                Some(entry.result.clone())
            }
            Some(_) => {
                // Expired: lazy eviction, reported as a miss.
                entries.remove(fingerprint.as_str());
                tracing::debug!(fingerprint = %fingerprint, "forecast cache entry expired");
                None
            }
            None => None,
        }
    }

    fn put_at(&self, fingerprint: Fingerprint, result: JsonValue, now: DateTime<Utc>) {
        let entry = CacheEntry {
            result,
            expires_at: now + self.ttl,
        };
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(fingerprint.as_str().to_string(), entry);
        tracing::debug!(fingerprint = %fingerprint, "forecast result cached");
    }
}

impl Default for InMemoryForecastCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheService for InMemoryForecastCache {
    fn get(&self, fingerprint: &Fingerprint) -> Option<JsonValue> {
        self.get_at(fingerprint, Utc::now())
    }

    fn put(&self, fingerprint: Fingerprint, result: JsonValue) {
        self.put_at(fingerprint, result, Utc::now());
    }

    fn evict(&self, fingerprint: &Fingerprint) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(fingerprint.as_str());
    }
}
