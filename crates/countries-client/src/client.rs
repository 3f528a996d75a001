//! REST Countries client with an ordered endpoint fallback chain.

use crate::error::CountriesError;
use crate::fallback::fallback_countries;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Endpoints tried in order.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://restcountries.com/v3.1/all?fields=name,cca2,cca3,flags,idd",
    "https://restcountries.com/v3.1/independent?fields=name,cca2,cca3,flags,idd",
    "https://restcountries.com/v3.1/region/Europe?fields=name,cca2,cca3,flags,idd",
];

#[derive(Clone)]
pub struct CountriesClient {
    client: Client,
    endpoints: Vec<String>,
}

impl CountriesClient {
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Result<Self, CountriesError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoints })
    }

    /// Countries sorted by common name. Falls through the endpoints in order
    /// and ends at the built-in list, so this never fails.
    #[instrument(skip(self), fields(endpoints = self.endpoints.len()))]
    pub async fn fetch_countries(&self) -> Vec<Country> {
        for endpoint in &self.endpoints {
            match self.fetch_from(endpoint).await {
                Ok(countries) => {
                    info!("Countries loaded from: {} ({} entries)", endpoint, countries.len());
                    return countries;
                }
                Err(e) => {
                    warn!("Failed to fetch from {}: {}", endpoint, e);
                }
            }
        }

        warn!("All country endpoints failed, using fallback countries");
        fallback_countries()
    }

    /// Fetch and normalize one endpoint.
    pub async fn fetch_from(&self, endpoint: &str) -> Result<Vec<Country>, CountriesError> {
        let response = self
            .client
            .get(endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CountriesError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let raw: Vec<RawCountry> = serde_json::from_str(&body)?;
        debug!("Endpoint returned {} raw countries", raw.len());

        let mut countries: Vec<Country> = raw.into_iter().filter_map(RawCountry::into_country).collect();
        if countries.is_empty() {
            return Err(CountriesError::Empty);
        }

        countries.sort_by(|a, b| a.name.common.cmp(&b.name.common));
        Ok(countries)
    }
}

/// First country using `dial_code`.
pub fn find_by_dial_code<'a>(countries: &'a [Country], dial_code: &str) -> Option<&'a Country> {
    let wanted = dial_code.trim();
    countries.iter().find(|c| c.dial_code == wanted)
}

/// Countries whose name, ISO code, or dial code contains `query` (case-insensitive).
pub fn filter_countries<'a>(countries: &'a [Country], query: &str) -> Vec<&'a Country> {
    let needle = query.trim().to_lowercase();
    countries
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.common.to_lowercase().contains(&needle)
                || c.cca2.to_lowercase() == needle
                || c.cca3.to_lowercase() == needle
                || c.dial_code.contains(&needle)
        })
        .collect()
}
