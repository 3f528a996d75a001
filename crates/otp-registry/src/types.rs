//! OTP records and registry configuration.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of digits in an issued code.
pub const CODE_LENGTH: usize = 6;

/// Registry tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// How long an issued code stays valid.
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub ttl: Duration,

    /// Minimum time between two issuances for the same phone.
    #[serde(default = "default_cooldown", with = "humantime_serde")]
    pub cooldown: Duration,

    /// Wrong guesses allowed before the record is dropped.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Shortest phone string accepted by `issue`.
    #[serde(default = "default_min_phone_len")]
    pub min_phone_len: usize,

    /// Period of the background expiry sweep.
    #[serde(default = "default_sweep_interval", with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            cooldown: default_cooldown(),
            max_attempts: default_max_attempts(),
            min_phone_len: default_min_phone_len(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

fn default_ttl() -> Duration {
    Duration::from_secs(10 * 60)
}

// Re-issue opens up in the last minute of the validity window.
fn default_cooldown() -> Duration {
    Duration::from_secs(9 * 60)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_min_phone_len() -> usize {
    10
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

/// A live one-time code for a phone number.
///
/// Only the SHA-256 digest of the code is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub phone: String,
    pub code_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

impl OtpRecord {
    pub fn new(phone: impl Into<String>, code: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            phone: phone.into(),
            code_hash: hash_code(code),
            issued_at: now,
            expires_at: add_saturating(now, ttl),
            attempts: 0,
        }
    }

    /// Whether the record is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Time left before a new code may be issued, or `None` if allowed now.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>, cooldown: Duration) -> Option<Duration> {
        if self.is_expired(now) {
            return None;
        }

        let open_at = add_saturating(self.issued_at, cooldown);
        (now < open_at)
            .then(|| (open_at - now).to_std().ok())
            .flatten()
    }

    /// Check a submitted code against the stored digest.
    pub fn matches(&self, code: &str) -> bool {
        hash_code(code) == self.code_hash
    }
}

/// Result of a successful `issue`.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// The code, returned so the simulated delivery can show it.
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Read-only view of a live record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpStatus {
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

/// Uniformly random code in `100000..=999999`.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999u32).to_string()
}

/// Hash a code using SHA-256.
pub fn hash_code(code: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// `start + duration`, clamped to the latest representable instant.
fn add_saturating(start: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
