//! Country records and the REST Countries wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

/// A country with a dialable calling code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: CountryName,
    pub cca2: String,
    pub cca3: String,
    pub flag: String,
    pub dial_code: String,
}

/// Country as returned with `fields=name,cca2,cca3,flags,idd`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    pub name: CountryName,
    #[serde(default)]
    pub cca2: String,
    #[serde(default)]
    pub cca3: String,
    pub flags: Option<Flags>,
    pub idd: Option<Idd>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Flags {
    pub svg: Option<String>,
    pub png: Option<String>,
}

/// International direct dialing: root ("+4") plus suffixes ("4").
#[derive(Debug, Clone, Deserialize)]
pub struct Idd {
    pub root: Option<String>,
    pub suffixes: Option<Vec<String>>,
}

impl RawCountry {
    /// Convert, dropping countries without a complete calling code.
    pub fn into_country(self) -> Option<Country> {
        let idd = self.idd?;
        let root = idd.root.filter(|r| !r.is_empty())?;
        let suffix = idd
            .suffixes
            .and_then(|s| s.into_iter().next())
            .filter(|s| !s.is_empty())?;

        let flag = self
            .flags
            .and_then(|f| f.svg.or(f.png))
            .unwrap_or_default();

        Some(Country {
            name: self.name,
            cca2: self.cca2,
            cca3: self.cca3,
            flag,
            dial_code: format!("{}{}", root, suffix),
        })
    }
}
