//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use gemini_client::GenerationConfig;
use otp_registry::OtpConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OTP registry configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Country lookup configuration
    #[serde(default)]
    pub countries: CountriesConfig,

    /// Front-end configuration
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API key. Chat replies explain the missing key when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(default = "default_gemini_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Request timeout
    #[serde(default = "default_gemini_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountriesConfig {
    /// Whitespace-separated endpoint URLs, tried in order. URLs carry
    /// commas in their query strings, so commas do not split.
    #[serde(default = "default_country_endpoints")]
    pub endpoints: String,

    /// Per-endpoint timeout
    #[serde(default = "default_countries_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where session state is saved
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Save session state to `state_path`; otherwise keep it in memory
    #[serde(default = "default_true")]
    pub persist: bool,

    /// How long the assistant "thinks" before each reply
    #[serde(default = "default_thinking_delay", with = "humantime_serde")]
    pub thinking_delay: Duration,
}

// Default implementations
impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_url(),
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            timeout: default_gemini_timeout(),
        }
    }
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            endpoints: default_country_endpoints(),
            timeout: default_countries_timeout(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            state_path: default_state_path(),
            persist: default_true(),
            thinking_delay: default_thinking_delay(),
        }
    }
}

impl GeminiConfig {
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }
}

impl CountriesConfig {
    /// Endpoint URLs in configured order.
    pub fn endpoint_list(&self) -> Vec<String> {
        self.endpoints.split_whitespace().map(String::from).collect()
    }
}

// Default value functions
fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}

fn default_max_output_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

fn default_gemini_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_country_endpoints() -> String {
    countries_client::DEFAULT_ENDPOINTS.join(" ")
}

fn default_countries_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_state_path() -> PathBuf {
    PathBuf::from("chat-state.json")
}

fn default_true() -> bool {
    true
}

fn default_thinking_delay() -> Duration {
    Duration::from_secs(1)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Dial codes like +44 must stay strings.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
