//! Country lookup errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountriesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned status {0}")]
    Status(u16),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Endpoint returned no usable countries")]
    Empty,
}
