//! Country and dial-code lookup.

use crate::commands::{arguments, CommandHandler};
use crate::error::AppResult;
use async_trait::async_trait;
use countries_client::{filter_countries, CountriesClient, Country};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

pub struct CountriesHandler {
    client: Arc<CountriesClient>,
    cache: OnceCell<Vec<Country>>,
}

impl CountriesHandler {
    pub fn new(client: Arc<CountriesClient>) -> Self {
        Self {
            client,
            cache: OnceCell::new(),
        }
    }

    /// Fetched on first use, then served from memory.
    async fn countries(&self) -> &[Country] {
        self.cache
            .get_or_init(|| async { self.client.fetch_countries().await })
            .await
    }
}

#[async_trait]
impl CommandHandler for CountriesHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/countries")
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        let query = arguments(line);
        let countries = self.countries().await;
        let hits = filter_countries(countries, query);
        debug!("{} of {} countries match {:?}", hits.len(), countries.len(), query);

        if hits.is_empty() {
            return Ok(format!("No countries match \"{}\".", query));
        }

        let lines: Vec<String> = hits
            .iter()
            .map(|c| format!("{:>6}  {} ({})", c.dial_code, c.name.common, c.cca2))
            .collect();
        Ok(lines.join("\n"))
    }
}
