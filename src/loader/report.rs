use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Outcome of one load run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub schema: String,
    pub rows: usize,
    pub node_upserts: usize,
    pub relationship_upserts: usize,
    /// Creates rejected by a uniqueness constraint, i.e. entities that
    /// already existed.
    pub constraint_conflicts: usize,
    /// Passengers with a connection (`wait > 0`), by origin airport.
    pub connections_by_airport: BTreeMap<String, u64>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Default::default()
        }
    }

    pub fn record_connection(&mut self, airport: &str) {
        *self
            .connections_by_airport
            .entry(airport.to_string())
            .or_insert(0) += 1;
    }

    pub fn log_summary(&self) {
        log::info!(
            "Load complete - Schema: {}, Rows: {}, Node upserts: {}, Relationship upserts: {}, Constraint conflicts: {}, Time: {:.3}s",
            self.schema,
            self.rows,
            self.node_upserts,
            self.relationship_upserts,
            self.constraint_conflicts,
            self.elapsed.as_secs_f64()
        );
        if !self.connections_by_airport.is_empty() {
            log::info!("Connecting passengers by airport: {:?}", self.connections_by_airport);
        }
    }
}

/// Node and relationship counts read back from a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: BTreeMap<String, u64>,
    pub relationships: BTreeMap<String, u64>,
}

impl GraphSummary {
    pub fn total_nodes(&self) -> u64 {
        self.nodes.values().sum()
    }

    pub fn total_relationships(&self) -> u64 {
        self.relationships.values().sum()
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes ({}):", self.total_nodes())?;
        for (label, count) in &self.nodes {
            writeln!(f, "  {:<12} {}", label, count)?;
        }
        writeln!(f, "Relationships ({}):", self.total_relationships())?;
        for (rel_type, count) in &self.relationships {
            writeln!(f, "  {:<12} {}", rel_type, count)?;
        }
        Ok(())
    }
}
