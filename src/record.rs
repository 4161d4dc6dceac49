//! The flight/passenger row shared by the dataset generator, the CSV loader
//! tests and the document service.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 15] = [
    "id",
    "airline",
    "from",
    "to",
    "day",
    "month",
    "year",
    "age",
    "gender",
    "reason",
    "stay",
    "transit",
    "connection",
    "wait",
    "passenger_id",
];

/// One synthetic passenger trip.
///
/// Field order matches [`CSV_HEADER`]; `csv::Writer::serialize` relies on it
/// when writing the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: String,
    pub airline: String,
    pub from: String,
    pub to: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub age: i32,
    pub gender: String,
    pub reason: String,
    pub stay: String,
    #[serde(default)]
    pub transit: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub connection: bool,
    pub wait: i32,
    pub passenger_id: String,
}

/// Accepts `true`/`false` in any letter case, as a native boolean or a string.
/// Older datasets spell the flag `True`/`False`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl de::Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean or the strings true/false")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            parse_flag(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Case-insensitive `true`/`false` parse.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
