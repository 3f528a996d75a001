//! In-memory OTP registry with lazy expiry and a periodic sweep.

use crate::error::OtpError;
use crate::types::*;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// One-time code registry keyed by phone number.
///
/// At most one live record exists per phone. Every read re-checks expiry,
/// so the background sweep is only housekeeping.
#[derive(Clone)]
pub struct OtpRegistry {
    records: Arc<RwLock<HashMap<String, OtpRecord>>>,
    config: OtpConfig,
}

impl OtpRegistry {
    pub fn new(config: OtpConfig) -> Self {
        info!(
            "OTP registry initialized (ttl={:?}, cooldown={:?}, max_attempts={})",
            config.ttl, config.cooldown, config.max_attempts
        );

        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Spawn the background task that drops expired records.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            registry.sweep_loop().await;
        })
    }

    async fn sweep_loop(&self) {
        loop {
            tokio::time::sleep(self.config.sweep_interval).await;
            self.sweep_expired().await;
        }
    }

    /// Remove every expired record, returning how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let before_count = records.len();

        records.retain(|_, record| !record.is_expired(now));

        let removed = before_count - records.len();
        if removed > 0 {
            debug!("Swept {} expired OTP records", removed);
        }
        removed
    }

    /// Issue a fresh code for `phone`, replacing any record outside its cooldown.
    #[instrument(skip(self))]
    pub async fn issue(&self, phone: &str) -> Result<IssuedOtp, OtpError> {
        let phone = phone.trim();
        if phone.chars().count() < self.config.min_phone_len {
            return Err(OtpError::InvalidPhone(phone.to_string()));
        }

        let now = Utc::now();
        let mut records = self.records.write().await;

        if let Some(retry_after) = records
            .get(phone)
            .and_then(|existing| existing.cooldown_remaining(now, self.config.cooldown))
        {
            debug!("OTP re-issue refused, {:?} of cooldown left", retry_after);
            return Err(OtpError::Cooldown { retry_after });
        }

        let code = generate_code();
        let record = OtpRecord::new(phone, &code, now, self.config.ttl);
        let expires_at = record.expires_at;
        records.insert(phone.to_string(), record);

        // Stands in for SMS delivery.
        info!("[SIMULATED] OTP for {}: {}", phone, code);

        Ok(IssuedOtp { code, expires_at })
    }

    /// Check `code` for `phone`. The record is consumed on success, expiry,
    /// or once the attempt budget is spent.
    #[instrument(skip(self, code))]
    pub async fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        let phone = phone.trim();
        let code = code.trim();
        if phone.is_empty() || code.is_empty() {
            return Err(OtpError::MissingInput);
        }

        let now = Utc::now();
        let mut records = self.records.write().await;
        let record = records.get_mut(phone).ok_or(OtpError::NotFound)?;

        if record.is_expired(now) {
            records.remove(phone);
            return Err(OtpError::Expired);
        }

        if record.attempts >= self.config.max_attempts {
            records.remove(phone);
            return Err(OtpError::TooManyAttempts);
        }

        if record.matches(code) {
            records.remove(phone);
            info!("OTP verified for {}", phone);
            return Ok(());
        }

        record.attempts += 1;
        let remaining = self.config.max_attempts.saturating_sub(record.attempts);
        if remaining == 0 {
            records.remove(phone);
            warn!("OTP attempts exhausted for {}", phone);
        }

        Err(OtpError::InvalidCode { remaining })
    }

    /// Expiry and attempt count of the live record, if any.
    pub async fn status(&self, phone: &str) -> Option<OtpStatus> {
        let records = self.records.read().await;
        let now = Utc::now();

        records
            .get(phone.trim())
            .filter(|record| !record.is_expired(now))
            .map(|record| OtpStatus {
                expires_at: record.expires_at,
                attempts: record.attempts,
            })
    }

    /// Number of stored records, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
