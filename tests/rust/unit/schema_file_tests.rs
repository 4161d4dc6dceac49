//! Load schemas read from YAML files on disk.

#[cfg(test)]
mod schema_file_tests {
    use std::fs;

    use flightgraph::graph_catalog::{LoadSchema, SchemaError, BUILTIN_SCHEMAS};
    use tempfile::tempdir;

    #[test]
    fn test_shipped_yaml_matches_builtin() {
        for name in BUILTIN_SCHEMAS {
            let from_disk = LoadSchema::from_yaml_file(format!("schemas/{}.yaml", name)).unwrap();
            assert_eq!(from_disk, LoadSchema::builtin(name).unwrap(), "{}", name);
        }
    }

    #[test]
    fn test_resolve_custom_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routes.yaml");
        fs::write(
            &path,
            r#"
name: routes
nodes:
  - alias: origin
    label: Airport
    key:
      - { property: airport_name, column: from }
  - alias: destination
    label: Airport
    key:
      - { property: airport_name, column: to }
relationships:
  - { type: ROUTE, from: origin, to: destination }
"#,
        )
        .unwrap();

        let schema = LoadSchema::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(schema.name, "routes");
        assert_eq!(schema.constraints().len(), 1);
        assert_eq!(
            schema.required_columns().into_iter().collect::<Vec<_>>(),
            vec!["from", "to"]
        );
    }

    #[test]
    fn test_invalid_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "name: [unclosed").unwrap();
        assert!(matches!(
            LoadSchema::from_yaml_file(&path),
            Err(SchemaError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_resolve_prefers_builtin_names() {
        let schema = LoadSchema::resolve("airline_network").unwrap();
        assert_eq!(schema.name, "airline_network");
    }
}
