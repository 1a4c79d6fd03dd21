//! Deterministic request fingerprints.

use serde::Serialize;
use sha2::{Digest, Sha256};

use pharmaflow_core::{AgentError, AgentResult};

/// SHA-256 over the canonical JSON form of a request, hex-encoded.
///
/// Canonicalization goes through `serde_json::Value`, whose object keys are
/// ordered, so the digest is independent of the caller's field ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of<T: Serialize>(request: &T) -> AgentResult<Self> {
        let canonical = serde_json::to_value(request)
            .and_then(|value| serde_json::to_vec(&value))
            .map_err(|e| AgentError::internal(format!("failed to canonicalize request: {e}")))?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(Self(hex_encode(&hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
