//! Synthetic flight-passenger dataset generator.
//!
//! Produces a CSV with one row per passenger trip. Values come from the fixed
//! vocabularies in [`vocabulary`] with a few conditional rules:
//!
//! - origin and destination airports always differ
//! - without a connection the passenger never waits and no ground transit is
//!   recorded
//! - passengers flying back home always stay at home and never connect

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::record::FlightRecord;

pub mod vocabulary;

use vocabulary::*;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to create dataset file '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write dataset file '{}': {source}", path.display())]
    Write { path: PathBuf, source: csv::Error },
    #[error("failed to write dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush dataset file '{}': {source}", path.display())]
    Flush {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to flush dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid travel date range")]
    DateRange,
}

/// Writes a header plus `rows` synthetic records to `output`.
pub fn generate(output: impl AsRef<Path>, rows: usize) -> Result<(), GenerateError> {
    let path = output.as_ref();
    let file = File::create(path).map_err(|source| GenerateError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rng = StdRng::from_entropy();
    generate_with_rng(file, rows, &mut rng).map_err(|e| match e {
        GenerateError::Csv(source) => GenerateError::Write {
            path: path.to_path_buf(),
            source,
        },
        GenerateError::Io(source) => GenerateError::Flush {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    log::info!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

/// Seedable core of [`generate`]: writes the header and `rows` records into
/// any writer.
pub fn generate_with_rng<W: Write, R: Rng + ?Sized>(
    writer: W,
    rows: usize,
    rng: &mut R,
) -> Result<(), GenerateError> {
    let dates = DateSampler::new()?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    if rows == 0 {
        // `serialize` emits the header lazily with the first record.
        csv_writer.write_record(crate::record::CSV_HEADER)?;
    }

    for _ in 0..rows {
        let record = random_record(rng, &dates);
        csv_writer.serialize(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Draws one record, applying the conditional field rules.
pub fn random_record<R: Rng + ?Sized>(rng: &mut R, dates: &DateSampler) -> FlightRecord {
    let passenger_id = random_id(rng, PASSENGER_ID_PREFIX, PASSENGER_ID_LEN);
    let flight_id = random_id(rng, FLIGHT_ID_PREFIX, FLIGHT_ID_LEN);

    let from = pick(rng, &AIRPORTS);
    let mut to = pick(rng, &AIRPORTS);
    while from == to {
        to = pick(rng, &AIRPORTS);
    }

    let date = dates.sample(rng);
    let reason = pick(rng, &REASONS);
    let mut stay = pick(rng, &STAYS);
    let mut connection = rng.gen_bool(0.5);
    let mut wait = rng.gen_range(MIN_WAIT_MINUTES..=MAX_WAIT_MINUTES);
    let mut transit = pick(rng, &TRANSITS);

    if !connection {
        wait = 0;
        transit = "";
    }

    if reason == REASON_BACK_HOME {
        stay = STAY_HOME;
        connection = false;
        wait = 0;
    }

    FlightRecord {
        id: flight_id,
        airline: pick(rng, &AIRLINES).to_string(),
        from: from.to_string(),
        to: to.to_string(),
        day: date.day() as i32,
        month: date.month() as i32,
        year: date.year(),
        age: rng.gen_range(MIN_AGE..=MAX_AGE),
        gender: pick(rng, &GENDERS).to_string(),
        reason: reason.to_string(),
        stay: stay.to_string(),
        transit: transit.to_string(),
        connection,
        wait,
        passenger_id,
    }
}

/// Uniform day sampler over `[DATE_RANGE_START, DATE_RANGE_END)`.
#[derive(Debug, Clone, Copy)]
pub struct DateSampler {
    start: NaiveDate,
    days: i64,
}

impl DateSampler {
    pub fn new() -> Result<Self, GenerateError> {
        let (sy, sm, sd) = DATE_RANGE_START;
        let (ey, em, ed) = DATE_RANGE_END;
        let start = NaiveDate::from_ymd_opt(sy, sm, sd).ok_or(GenerateError::DateRange)?;
        let end = NaiveDate::from_ymd_opt(ey, em, ed).ok_or(GenerateError::DateRange)?;
        let days = (end - start).num_days();
        if days <= 0 {
            return Err(GenerateError::DateRange);
        }
        Ok(Self { start, days })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        self.start + Duration::days(rng.gen_range(0..self.days))
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values[rng.gen_range(0..values.len())]
}

fn random_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str, len: usize) -> String {
    let mut id = String::with_capacity(prefix.len() + len);
    id.push_str(prefix);
    for _ in 0..len {
        let idx = rng.gen_range(0..ID_ALPHABET.len());
        id.push(ID_ALPHABET[idx] as char);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_random_id_shape() {
        let mut rng = seeded(7);
        let id = random_id(&mut rng, FLIGHT_ID_PREFIX, FLIGHT_ID_LEN);
        assert_eq!(id.len(), 10);
        assert!(id.starts_with("FL"));
        assert!(id[2..]
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn test_date_sampler_stays_in_range() {
        let sampler = DateSampler::new().unwrap();
        let mut rng = seeded(11);
        let start = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 4, 25).unwrap();
        for _ in 0..5_000 {
            let date = sampler.sample(&mut rng);
            assert!(date >= start && date < end, "{} out of range", date);
        }
    }

    #[test]
    fn test_records_follow_field_rules() {
        let sampler = DateSampler::new().unwrap();
        let mut rng = seeded(42);
        for _ in 0..2_000 {
            let r = random_record(&mut rng, &sampler);
            assert_ne!(r.from, r.to);
            assert!((MIN_AGE..=MAX_AGE).contains(&r.age));
            if r.reason == REASON_BACK_HOME {
                assert_eq!(r.stay, STAY_HOME);
                assert!(!r.connection);
                assert_eq!(r.wait, 0);
            } else if r.connection {
                assert!((MIN_WAIT_MINUTES..=MAX_WAIT_MINUTES).contains(&r.wait));
                assert!(!r.transit.is_empty());
            } else {
                assert_eq!(r.wait, 0);
                assert_eq!(r.transit, "");
            }
        }
    }

    #[test]
    fn test_zero_rows_still_writes_header() {
        let mut out = Vec::new();
        generate_with_rng(&mut out, 0, &mut seeded(1)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), crate::record::CSV_HEADER.join(","));
    }

    #[test]
    fn test_generate_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("out.csv");
        let err = generate(&missing, 3).unwrap_err();
        assert!(matches!(err, GenerateError::Create { .. }));
        assert!(err.to_string().contains("out.csv"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_generate_names_path_when_flush_fails() {
        let err = generate("/dev/full", 1).unwrap_err();
        assert!(matches!(err, GenerateError::Flush { .. }));
        assert!(err.to_string().contains("/dev/full"));
    }
}
