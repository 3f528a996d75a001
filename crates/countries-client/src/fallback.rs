//! Static country list used when every endpoint fails.

use crate::types::{Country, CountryName};

const FALLBACK: &[(&str, &str, &str, &str, &str)] = &[
    ("United States", "United States of America", "US", "USA", "+1"),
    ("United Kingdom", "United Kingdom of Great Britain and Northern Ireland", "GB", "GBR", "+44"),
    ("India", "Republic of India", "IN", "IND", "+91"),
    ("Canada", "Canada", "CA", "CAN", "+1"),
    ("Australia", "Commonwealth of Australia", "AU", "AUS", "+61"),
    ("Germany", "Federal Republic of Germany", "DE", "DEU", "+49"),
    ("France", "French Republic", "FR", "FRA", "+33"),
    ("Japan", "Japan", "JP", "JPN", "+81"),
    ("Brazil", "Federative Republic of Brazil", "BR", "BRA", "+55"),
    ("China", "People's Republic of China", "CN", "CHN", "+86"),
];

pub fn fallback_countries() -> Vec<Country> {
    FALLBACK
        .iter()
        .map(|(common, official, cca2, cca3, dial_code)| Country {
            name: CountryName {
                common: (*common).into(),
                official: (*official).into(),
            },
            cca2: (*cca2).into(),
            cca3: (*cca3).into(),
            flag: format!("https://flagcdn.com/{}.svg", cca2.to_lowercase()),
            dial_code: (*dial_code).into(),
        })
        .collect()
}
