//! Monthly travel statistics.
//!
//! A fixed three-stage pipeline over flight documents:
//!
//! 1. `$match` adult passengers (`age >= 18`) travelling for pleasure or
//!    business, not by their own car, restricted to one airline or to one
//!    destination airport reached without a connection
//! 2. `$group` by `month`, counting documents into `total_times`
//! 3. `$sort` by `total_times` descending, then month ascending
//!
//! [`MonthlyTravelQuery::pipeline`] renders it for MongoDB and
//! [`MonthlyTravelQuery::evaluate`] runs the same stages over in-memory
//! records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use mongodb::bson::{doc, Bson, Document};
use thiserror::Error;

use super::models::MonthlyCount;
use crate::generator::vocabulary::{REASON_BUSINESS, REASON_PLEASURE, TRANSIT_OWN_CAR};
use crate::record::FlightRecord;

pub const ADULT_AGE: i32 = 18;
pub const COUNTED_REASONS: [&str; 2] = [REASON_PLEASURE, REASON_BUSINESS];
pub const EXCLUDED_TRANSITS: [&str; 1] = [TRANSIT_OWN_CAR];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown statistics option `{0}` (expected `airline` or `airport`)")]
pub struct UnknownOption(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsOption {
    Airline,
    Airport,
}

impl StatisticsOption {
    pub const ALL: [StatisticsOption; 2] = [StatisticsOption::Airline, StatisticsOption::Airport];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticsOption::Airline => "airline",
            StatisticsOption::Airport => "airport",
        }
    }
}

impl fmt::Display for StatisticsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatisticsOption {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airline" => Ok(StatisticsOption::Airline),
            "airport" => Ok(StatisticsOption::Airport),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTravelQuery {
    pub option: StatisticsOption,
    pub chosen: String,
}

impl MonthlyTravelQuery {
    pub fn new(option: StatisticsOption, chosen: impl Into<String>) -> Self {
        Self {
            option,
            chosen: chosen.into(),
        }
    }

    pub fn parse(option: &str, chosen: &str) -> Result<Self, UnknownOption> {
        Ok(Self::new(option.parse()?, chosen))
    }

    /// The `$match` stage.
    pub fn filter(&self) -> Document {
        let mut filter = match self.option {
            StatisticsOption::Airline => doc! { "airline": self.chosen.clone() },
            // Documents written before `connection` became a boolean carry
            // the string form.
            StatisticsOption::Airport => doc! {
                "to": self.chosen.clone(),
                "connection": { "$in": [false, "False", "false"] },
            },
        };
        filter.insert("age", doc! { "$gte": ADULT_AGE });
        filter.insert(
            "reason",
            doc! { "$in": COUNTED_REASONS.iter().map(|r| Bson::from(*r)).collect::<Vec<_>>() },
        );
        filter.insert(
            "transit",
            doc! { "$nin": EXCLUDED_TRANSITS.iter().map(|t| Bson::from(*t)).collect::<Vec<_>>() },
        );
        filter
    }

    pub fn pipeline(&self) -> Vec<Document> {
        vec![
            doc! { "$match": self.filter() },
            doc! { "$group": { "_id": "$month", "total_times": { "$sum": 1 } } },
            doc! { "$sort": { "total_times": -1, "_id": 1 } },
        ]
    }

    pub fn matches(&self, flight: &FlightRecord) -> bool {
        let selected = match self.option {
            StatisticsOption::Airline => flight.airline == self.chosen,
            StatisticsOption::Airport => flight.to == self.chosen && !flight.connection,
        };
        selected
            && flight.age >= ADULT_AGE
            && COUNTED_REASONS.contains(&flight.reason.as_str())
            && !EXCLUDED_TRANSITS.contains(&flight.transit.as_str())
    }

    pub fn evaluate<'a, I>(&self, flights: I) -> Vec<MonthlyCount>
    where
        I: IntoIterator<Item = &'a FlightRecord>,
    {
        let mut by_month: BTreeMap<i32, i64> = BTreeMap::new();
        for flight in flights.into_iter().filter(|f| self.matches(f)) {
            *by_month.entry(flight.month).or_insert(0) += 1;
        }
        let mut counts: Vec<MonthlyCount> = by_month
            .into_iter()
            .map(|(month, total_times)| MonthlyCount { month, total_times })
            .collect();
        sort_counts(&mut counts);
        counts
    }
}

/// Count descending, month ascending.
pub fn sort_counts(counts: &mut [MonthlyCount]) {
    counts.sort_by(|a, b| {
        b.total_times
            .cmp(&a.total_times)
            .then(a.month.cmp(&b.month))
    });
}
