//! Phone login and signup through simulated OTPs.

use crate::commands::{arguments, CommandHandler, SharedStore};
use crate::error::AppResult;
use crate::validation::*;
use async_trait::async_trait;
use conversation_store::User;
use otp_registry::OtpRegistry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

const NO_PENDING: &str = "No OTP requested. Use /login or /signup first.";

/// A login or signup waiting for its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuth {
    /// Dial code plus national number, the OTP key.
    pub phone: String,
    pub country_code: String,
    /// Name and email given at signup.
    pub profile: Option<(String, String)>,
}

/// State shared by the auth commands.
#[derive(Clone)]
pub struct AuthFlow {
    store: SharedStore,
    otp: OtpRegistry,
    pending: Arc<Mutex<Option<PendingAuth>>>,
}

impl AuthFlow {
    pub fn new(store: SharedStore, otp: OtpRegistry) -> Self {
        Self {
            store,
            otp,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn pending(&self) -> Option<PendingAuth> {
        self.pending.lock().await.clone()
    }

    async fn already_logged_in(&self) -> Option<String> {
        let store = self.store.read().await;
        if !store.is_authenticated() {
            return None;
        }
        let who = store.user().map(|u| u.phone.as_str()).unwrap_or("unknown");
        Some(format!("Already logged in as {}. Use /logout first.", who))
    }

    /// Issue a code and remember who asked for it.
    async fn start(
        &self,
        country_code: &str,
        national: &str,
        profile: Option<(String, String)>,
    ) -> AppResult<String> {
        let phone = format!("{}{}", country_code, national);

        match self.otp.issue(&phone).await {
            Ok(issued) => {
                *self.pending.lock().await = Some(PendingAuth {
                    phone: phone.clone(),
                    country_code: country_code.to_string(),
                    profile,
                });
                Ok(format!(
                    "OTP sent successfully to {}! Check your SMS.\nDevelopment code: {} (enter it with /otp <code>)",
                    phone, issued.code
                ))
            }
            Err(e) => Ok(e.to_string()),
        }
    }
}

pub struct LoginHandler {
    flow: AuthFlow,
}

impl LoginHandler {
    pub fn new(flow: AuthFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for LoginHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/login")
    }

    #[instrument(skip(self, line))]
    async fn execute(&self, line: &str) -> AppResult<String> {
        if let Some(message) = self.flow.already_logged_in().await {
            return Ok(message);
        }

        let parts: Vec<&str> = arguments(line).split_whitespace().collect();
        let [country_code, phone] = parts.as_slice() else {
            return Ok("Usage: /login <dial-code> <phone>, e.g. /login +91 9876543210".into());
        };

        if let Err(message) = validate_dial_code(country_code).and(validate_phone(phone)) {
            return Ok(message.into());
        }

        self.flow.start(country_code, phone, None).await
    }
}

pub struct SignupHandler {
    flow: AuthFlow,
}

impl SignupHandler {
    pub fn new(flow: AuthFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for SignupHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/signup")
    }

    #[instrument(skip(self, line))]
    async fn execute(&self, line: &str) -> AppResult<String> {
        if let Some(message) = self.flow.already_logged_in().await {
            return Ok(message);
        }

        let parts: Vec<&str> = arguments(line).split_whitespace().collect();
        if parts.len() < 4 {
            return Ok("Usage: /signup <dial-code> <phone> <email> <name>".into());
        }
        let (country_code, phone, email) = (parts[0], parts[1], parts[2]);
        let name = parts[3..].join(" ");

        if let Err(message) = validate_name(&name)
            .and(validate_email(email))
            .and(validate_dial_code(country_code))
            .and(validate_phone(phone))
        {
            return Ok(message.into());
        }

        self.flow
            .start(country_code, phone, Some((name, email.to_string())))
            .await
    }
}

pub struct OtpHandler {
    flow: AuthFlow,
}

impl OtpHandler {
    pub fn new(flow: AuthFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for OtpHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/otp")
    }

    #[instrument(skip(self, line))]
    async fn execute(&self, line: &str) -> AppResult<String> {
        let Some(pending) = self.flow.pending().await else {
            return Ok(NO_PENDING.into());
        };

        let code = arguments(line);
        if let Err(message) = validate_otp(code) {
            return Ok(message.into());
        }

        if let Err(e) = self.flow.otp.verify(&pending.phone, code).await {
            return Ok(e.to_string());
        }

        let is_signup = pending.profile.is_some();
        let mut user = User::new(&pending.phone, &pending.country_code);
        if let Some((name, email)) = pending.profile {
            user = user.with_profile(name, email);
        }

        let mut store = self.flow.store.write().await;
        store.login(user);
        *self.flow.pending.lock().await = None;
        info!("User logged in");

        let headline = if is_signup {
            "Account created successfully! Welcome to Gemini AI!"
        } else {
            "Login successful! Welcome to Gemini AI!"
        };
        let welcome = store
            .messages()
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(format!("{}\nGemini: {}", headline, welcome))
    }
}

pub struct ResendHandler {
    flow: AuthFlow,
}

impl ResendHandler {
    pub fn new(flow: AuthFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for ResendHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/resend")
    }

    async fn execute(&self, _line: &str) -> AppResult<String> {
        let Some(pending) = self.flow.pending().await else {
            return Ok(NO_PENDING.into());
        };

        let national = pending
            .phone
            .strip_prefix(&pending.country_code)
            .unwrap_or(&pending.phone)
            .to_string();

        self.flow
            .start(&pending.country_code, &national, pending.profile)
            .await
    }
}

pub struct LogoutHandler {
    flow: AuthFlow,
}

impl LogoutHandler {
    pub fn new(flow: AuthFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for LogoutHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/logout")
    }

    async fn execute(&self, _line: &str) -> AppResult<String> {
        let mut store = self.flow.store.write().await;
        if !store.is_authenticated() {
            return Ok("You are not logged in.".into());
        }

        store.logout();
        *self.flow.pending.lock().await = None;
        info!("User logged out");
        Ok("Logged out successfully.".into())
    }
}
