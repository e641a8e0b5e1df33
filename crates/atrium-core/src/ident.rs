//! # Customer Identifiers
//!
//! External-facing customer ids of the form
//! `CLT<base36 timestamp><5-char suffix>`, e.g. `CLTLZ3K9Q2A7F3C1`.
//!
//! ```text
//!   CLT   LZ3K9Q2A      7F3C1
//!   ───   ────────      ─────
//!   fixed base-36 ms    first 5 hex chars of SHA-256(random nonce),
//!   prefix since epoch  uppercased
//! ```
//!
//! Ids are probabilistically unique only. The service re-checks every
//! generated id against the collection inside the store's critical section
//! and asks for another one on collision.

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix of every generated customer id.
pub const CUSTOMER_ID_PREFIX: &str = "CLT";

/// Number of suffix characters after the timestamp.
pub const SUFFIX_LEN: usize = 5;

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encodes `n` in uppercase base 36.
///
/// ## Example
/// ```rust
/// use atrium_core::ident::to_base36;
///
/// assert_eq!(to_base36(0), "0");
/// assert_eq!(to_base36(35), "Z");
/// assert_eq!(to_base36(36), "10");
/// ```
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();

    // Every byte comes from BASE36_DIGITS, which is ASCII.
    out.into_iter().map(char::from).collect()
}

/// Builds an id from a millisecond timestamp and a nonce.
///
/// Deterministic: the same inputs give the same id.
pub fn generate_at(timestamp_ms: u64, nonce: &[u8]) -> String {
    let digest = Sha256::digest(nonce);
    let suffix: String = digest
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<String>()
        .chars()
        .take(SUFFIX_LEN)
        .collect();

    format!("{}{}{}", CUSTOMER_ID_PREFIX, to_base36(timestamp_ms), suffix)
}

/// Source of fresh customer ids.
///
/// The service holds one of these; tests swap in scripted generators to
/// force collisions.
pub trait IdGenerator: Send + Sync {
    /// Returns a new candidate id.
    fn generate(&self) -> String;
}

/// Wall-clock timestamp plus a random UUID v4 nonce.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockIdGenerator;

impl IdGenerator for ClockIdGenerator {
    fn generate(&self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        generate_at(millis, Uuid::new_v4().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_base36_round_values() {
        assert_eq!(to_base36(1_295), "ZZ");
        assert_eq!(to_base36(1_296), "100");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_generate_at_shape() {
        let id = generate_at(1_700_000_000_000, b"nonce");

        assert!(id.starts_with("CLTLOYW3V28"));
        assert_eq!(id.len(), CUSTOMER_ID_PREFIX.len() + 8 + SUFFIX_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_at_is_deterministic() {
        assert_eq!(generate_at(42, b"a"), generate_at(42, b"a"));
        assert_ne!(generate_at(42, b"a"), generate_at(42, b"b"));
    }

    #[test]
    fn test_clock_generator_produces_distinct_ids() {
        let generator = ClockIdGenerator;
        let ids: HashSet<String> = (0..1_000).map(|_| generator.generate()).collect();

        // 1000 draws over 16^5 suffixes, spread across several milliseconds
        assert!(ids.len() >= 990);
        assert!(ids.iter().all(|id| id.starts_with(CUSTOMER_ID_PREFIX)));
    }
}
