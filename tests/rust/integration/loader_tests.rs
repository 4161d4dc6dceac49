//! Loader runs against the in-memory graph store.

#[cfg(test)]
mod loader_integration_tests {
    use std::collections::{BTreeMap, HashSet};
    use std::fs;

    use flightgraph::generator;
    use flightgraph::graph_catalog::LoadSchema;
    use flightgraph::graph_store::{GraphStore, InMemoryGraphStore, NodeKey, Property};
    use flightgraph::loader::{summarize, GraphLoader, LoadError};
    use flightgraph::record::FlightRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn dataset(rows: usize, seed: u64) -> (Vec<u8>, Vec<FlightRecord>) {
        let mut buffer = Vec::new();
        generator::generate_with_rng(&mut buffer, rows, &mut StdRng::seed_from_u64(seed)).unwrap();
        let records = csv::Reader::from_reader(buffer.as_slice())
            .deserialize()
            .collect::<Result<Vec<FlightRecord>, _>>()
            .unwrap();
        (buffer, records)
    }

    fn flight_key(id: &str) -> NodeKey {
        NodeKey::new("Flight", vec![Property::new("flight_id", id)])
    }

    fn airport_key(name: &str) -> NodeKey {
        NodeKey::new("Airport", vec![Property::new("airport_name", name)])
    }

    #[tokio::test]
    async fn test_loading_twice_changes_nothing() {
        let (csv, _) = dataset(60, 11);
        let loader = GraphLoader::new(
            InMemoryGraphStore::new(),
            LoadSchema::flight_passengers().unwrap(),
        );

        loader.load_reader(csv.as_slice()).await.unwrap();
        let once = summarize(loader.store(), loader.schema()).await.unwrap();

        let second = loader.load_reader(csv.as_slice()).await.unwrap();
        let twice = summarize(loader.store(), loader.schema()).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(second.rows, 60);
        assert_eq!(second.constraint_conflicts, 0);
    }

    #[tokio::test]
    async fn test_every_flight_has_one_origin_and_one_destination() {
        let (csv, records) = dataset(40, 5);
        let store = InMemoryGraphStore::new();
        let loader = GraphLoader::new(store, LoadSchema::flight_passengers().unwrap());
        let report = loader.load_reader(csv.as_slice()).await.unwrap();
        assert_eq!(report.rows, 40);
        assert_eq!(report.node_upserts, 40 * 5);
        assert_eq!(report.relationship_upserts, 40 * 4);

        let store = loader.store();
        let flight_ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            store.count_nodes("Flight").await.unwrap(),
            flight_ids.len() as u64
        );

        for record in &records {
            let flight = flight_key(&record.id);
            assert_eq!(store.out_degree(&flight, "FROM").await, 1);
            assert_eq!(store.out_degree(&flight, "TO").await, 1);
            assert_eq!(
                store.targets(&flight, "TO").await,
                vec![airport_key(&record.to)]
            );
            assert_eq!(
                store.targets(&flight, "FROM").await,
                vec![airport_key(&record.from)]
            );
        }

        let boardings: HashSet<(&str, &str)> = records
            .iter()
            .map(|r| (r.passenger_id.as_str(), r.id.as_str()))
            .collect();
        assert_eq!(
            store.count_relationships("BOARDED").await.unwrap(),
            boardings.len() as u64
        );
    }

    #[tokio::test]
    async fn test_destination_seen_only_as_destination_gets_its_edge() {
        let csv = "id,airline,from,to,day,month,year,age,gender,reason,stay,transit,connection,wait,passenger_id\n\
                   FLONLYONE1,Alaska,PDX,JFK,14,2,2019,61,female,Back Home,Home,,False,0,PASSONLY01\n";
        let loader = GraphLoader::new(
            InMemoryGraphStore::new(),
            LoadSchema::flight_passengers().unwrap(),
        );
        loader.load_reader(csv.as_bytes()).await.unwrap();

        let store = loader.store();
        assert_eq!(store.count_nodes("Airport").await.unwrap(), 2);
        assert_eq!(
            store.targets(&flight_key("FLONLYONE1"), "TO").await,
            vec![airport_key("JFK")]
        );
        assert_eq!(store.count_nodes("Date").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_connection_tally_matches_waiting_passengers() {
        let (csv, records) = dataset(120, 99);
        let loader = GraphLoader::new(
            InMemoryGraphStore::new(),
            LoadSchema::flight_passengers().unwrap(),
        );
        let report = loader.load_reader(csv.as_slice()).await.unwrap();

        let mut expected: BTreeMap<String, u64> = BTreeMap::new();
        for r in records.iter().filter(|r| r.wait > 0) {
            *expected.entry(r.from.clone()).or_insert(0) += 1;
        }
        assert_eq!(report.connections_by_airport, expected);
    }

    #[tokio::test]
    async fn test_airline_network_schema() {
        let (csv, records) = dataset(30, 3);
        let loader = GraphLoader::new(
            InMemoryGraphStore::new(),
            LoadSchema::airline_network().unwrap(),
        );
        loader.load_reader(csv.as_slice()).await.unwrap();

        let summary = summarize(loader.store(), loader.schema()).await.unwrap();
        let airlines: HashSet<&str> = records.iter().map(|r| r.airline.as_str()).collect();
        assert_eq!(summary.nodes["Airline"], airlines.len() as u64);

        let served: HashSet<(&str, &str)> = records
            .iter()
            .flat_map(|r| [(r.airline.as_str(), r.from.as_str()), (r.airline.as_str(), r.to.as_str())])
            .collect();
        assert_eq!(summary.relationships["OPERATES_AT"], served.len() as u64);
    }

    #[tokio::test]
    async fn test_load_from_file_and_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");
        let (csv, _) = dataset(10, 1);
        fs::write(&path, csv).unwrap();

        let loader = GraphLoader::new(
            InMemoryGraphStore::new(),
            LoadSchema::flight_passengers().unwrap(),
        );
        let report = loader.load(&path).await.unwrap();
        assert_eq!(report.rows, 10);
        assert_eq!(loader.store().constraints().await.len(), 4);

        let err = loader.load(dir.path().join("nope.csv")).await.unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[tokio::test]
    async fn test_malformed_row_stops_after_earlier_rows() {
        let csv = "id,airline,from,to,day,month,year,age,gender,reason,stay,transit,connection,wait,passenger_id\n\
                   FLGOODROW1,Alaska,PDX,JFK,14,2,2019,61,female,Back Home,Home,,false,0,PASSGOOD01\n\
                   FLBADROW01,Alaska,PDX,JFK,14,2,2019,sixty,female,Back Home,Home,,false,0,PASSBAD001\n";
        let loader = GraphLoader::new(
            InMemoryGraphStore::new(),
            LoadSchema::flight_passengers().unwrap(),
        );
        let err = loader.load_reader(csv.as_bytes()).await.unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 2, .. }));
        assert_eq!(loader.store().count_nodes("Flight").await.unwrap(), 1);
    }
}
