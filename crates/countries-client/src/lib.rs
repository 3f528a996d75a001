//! Country list with calling codes, for the phone-number picker.

mod client;
mod error;
mod fallback;
mod types;

pub use client::{filter_countries, find_by_dial_code, CountriesClient, DEFAULT_ENDPOINTS};
pub use error::CountriesError;
pub use fallback::fallback_countries;
pub use types::*;
