//! Tagged date encoding for persisted state.
//!
//! Dates are written as `{"__type": "Date", "value": "<RFC 3339>"}`.
//! Reading also accepts a bare RFC 3339 string.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DATE_TAG: &str = "Date";

#[derive(Serialize)]
struct TaggedRef<'a> {
    #[serde(rename = "__type")]
    kind: &'static str,
    value: &'a DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Encoded {
    Tagged {
        #[serde(rename = "__type")]
        kind: String,
        value: DateTime<Utc>,
    },
    Plain(DateTime<Utc>),
}

pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    TaggedRef {
        kind: DATE_TAG,
        value: date,
    }
    .serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    match Encoded::deserialize(deserializer)? {
        Encoded::Tagged { kind, value } if kind == DATE_TAG => Ok(value),
        Encoded::Tagged { kind, .. } => Err(D::Error::custom(format!(
            "unexpected __type {kind:?}, expected {DATE_TAG:?}"
        ))),
        Encoded::Plain(value) => Ok(value),
    }
}

/// Same encoding for optional dates.
pub mod option {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Tagged(#[serde(with = "super")] DateTime<Utc>);

    pub fn serialize<S: Serializer>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        date.map(Tagged).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<Tagged>::deserialize(deserializer)?.map(|tagged| tagged.0))
    }
}
