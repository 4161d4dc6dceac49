//! Tests for the dataset file written by `flightgraph generate`.

#[cfg(test)]
mod generator_file_tests {
    use std::fs;

    use flightgraph::generator::{self, vocabulary, GenerateError};
    use flightgraph::record::{FlightRecord, CSV_HEADER};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;
    use tempfile::tempdir;

    fn read_records(text: &str) -> Vec<FlightRecord> {
        csv::Reader::from_reader(text.as_bytes())
            .deserialize()
            .collect::<Result<Vec<FlightRecord>, _>>()
            .unwrap()
    }

    #[test]
    fn test_single_row_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.csv");
        generator::generate(&path, 1).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER.join(","));

        let record = &read_records(&text)[0];
        assert!(Regex::new(r"^FL[A-Z0-9]{8}$").unwrap().is_match(&record.id));
        assert!(Regex::new(r"^PASS[A-Z0-9]{6}$")
            .unwrap()
            .is_match(&record.passenger_id));
    }

    #[test]
    fn test_zero_rows_writes_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        generator::generate(&path, 0).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER.join(","));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            generator::generate(&path, 3),
            Err(GenerateError::Create { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_device_error_names_path() {
        let err = generator::generate("/dev/full", 5).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Flush { .. } | GenerateError::Write { .. }
        ));
        assert!(err.to_string().contains("/dev/full"), "{}", err);
    }

    #[test]
    fn test_row_rules_hold_across_many_rows() {
        let mut rng = StdRng::seed_from_u64(2023);
        let mut buffer = Vec::new();
        generator::generate_with_rng(&mut buffer, 500, &mut rng).unwrap();
        let records = read_records(std::str::from_utf8(&buffer).unwrap());
        assert_eq!(records.len(), 500);

        for r in &records {
            assert_ne!(r.from, r.to);
            assert!(vocabulary::AIRLINES.contains(&r.airline.as_str()));
            assert!(vocabulary::AIRPORTS.contains(&r.from.as_str()));
            assert!((vocabulary::MIN_AGE..=vocabulary::MAX_AGE).contains(&r.age));
            assert!((2013..=2023).contains(&r.year));
            assert!((1..=12).contains(&r.month));

            if r.reason == vocabulary::REASON_BACK_HOME {
                assert_eq!(r.stay, vocabulary::STAY_HOME);
                assert!(!r.connection);
                assert_eq!(r.wait, 0);
            } else if r.connection {
                assert!(
                    (vocabulary::MIN_WAIT_MINUTES..=vocabulary::MAX_WAIT_MINUTES)
                        .contains(&r.wait)
                );
                assert!(!r.transit.is_empty());
            } else {
                assert_eq!(r.wait, 0);
                assert!(r.transit.is_empty());
            }
        }
    }

    #[test]
    fn test_same_seed_same_file() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        generator::generate_with_rng(&mut first, 20, &mut StdRng::seed_from_u64(7)).unwrap();
        generator::generate_with_rng(&mut second, 20, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }
}
