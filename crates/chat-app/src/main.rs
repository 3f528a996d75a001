//! Gemini chat - terminal entry point.

use anyhow::Context;
use chat_app::commands::{default_handlers, Router};
use chat_app::config::Config;
use chat_app::error::AppResult;
use conversation_store::{ConversationStore, FileStorage, MemoryStorage, StateStorage};
use countries_client::CountriesClient;
use gemini_client::GeminiClient;
use otp_registry::OtpRegistry;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::RwLock;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.app.log_level);

    info!("Starting Gemini chat...");

    // Initialize clients
    let gemini = Arc::new(
        GeminiClient::new(
            config.gemini.api_key.clone(),
            &config.gemini.base_url,
            &config.gemini.model,
            config.gemini.generation(),
            config.gemini.timeout,
        )
        .context("Failed to create Gemini client")?,
    );

    if gemini.is_configured() {
        info!("Gemini ready - Model: {}", gemini.model());
    } else {
        warn!("GEMINI__API_KEY not set - chat replies will explain how to configure it");
    }

    let countries = Arc::new(
        CountriesClient::new(config.countries.endpoint_list(), config.countries.timeout)
            .context("Failed to create countries client")?,
    );

    let storage: Arc<dyn StateStorage> = if config.app.persist {
        info!("Session state file: {}", config.app.state_path.display());
        Arc::new(FileStorage::new(config.app.state_path.clone()))
    } else {
        info!("Session state kept in memory only");
        Arc::new(MemoryStorage::new())
    };

    let store = match ConversationStore::load_from(storage.as_ref()).await {
        Ok(store) => store,
        Err(e) => {
            warn!("Saved state unreadable, starting fresh: {}", e);
            ConversationStore::new()
        }
    };
    let greeting = store.user().map(|user| {
        format!(
            "Welcome back, {}! {} chat room(s) saved.",
            user.name.as_deref().unwrap_or(&user.phone),
            store.rooms().len()
        )
    });
    let store = Arc::new(RwLock::new(store));

    let otp = OtpRegistry::new(config.otp.clone());
    let sweeper = otp.spawn_sweeper();
    info!(
        "OTP registry ready (ttl={:?}, cooldown={:?}, max_attempts={})",
        config.otp.ttl, config.otp.cooldown, config.otp.max_attempts
    );

    // Create command handlers
    let router = Router::new(default_handlers(
        store.clone(),
        otp,
        gemini,
        countries,
        config.app.thinking_delay,
    ));
    info!("Registered {} command handlers", router.len());

    println!("{}", greeting.unwrap_or_else(|| "Gemini AI chat. Type /help to get started.".into()));

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    // Main input loop
    loop {
        tokio::select! {
            line = lines.next() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                    None => {
                        info!("Input closed");
                        break;
                    }
                };

                if let Some(response) = router.dispatch(&line).await {
                    println!("{}", response);

                    if let Err(e) = store.read().await.save_to(storage.as_ref()).await {
                        error!("Failed to save state: {}", e);
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    sweeper.abort();
    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so they stay out of the chat transcript.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
