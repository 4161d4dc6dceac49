use serde::{Deserialize, Serialize};

use crate::record::FlightRecord;

/// A flight document as stored, with the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFlight {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub flight: FlightRecord,
}

/// One row of the monthly travel statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// Month number, 1-12
    #[serde(rename = "_id")]
    pub month: i32,
    pub total_times: i64,
}

/// Query string of `GET /`.
#[derive(Debug, Deserialize)]
pub struct MonthlyTravelParams {
    /// `airline` or `airport`
    pub option: String,
    pub option_chosen: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
