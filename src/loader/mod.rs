//! CSV-to-graph loader.
//!
//! Streams a passenger CSV row by row and applies a [`LoadSchema`] to each
//! one: every node binding becomes a MERGE on its key properties, then every
//! relationship binding becomes a MERGE between the row's nodes. Loading the
//! same file twice leaves the graph unchanged.
//!
//! Rows are processed strictly in file order. A malformed row or a store
//! failure stops the load; writes already made by earlier rows (and earlier
//! steps of the failing row) stay in place.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::graph_catalog::{LoadSchema, PropertyKind, PropertyMapping};
use crate::graph_store::{
    GraphStore, GraphStoreError, NodeKey, NodeUpsert, Property, PropertyValue,
    RelationshipUpsert,
};
use crate::record::parse_flag;

pub mod report;

pub use report::{GraphSummary, LoadReport};

/// Columns feeding the per-airport connection tally.
const CONNECTION_AIRPORT_COLUMN: &str = "from";
const CONNECTION_WAIT_COLUMN: &str = "wait";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open CSV '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("CSV error at data row {row}: {source}")]
    Csv { row: usize, source: csv::Error },
    #[error("CSV header is missing column `{column}` required by schema `{schema}`")]
    MissingHeader { schema: String, column: String },
    #[error("data row {row} has no value for column `{column}`")]
    MissingColumn { row: usize, column: String },
    #[error("data row {row}: column `{column}` expected {expected}, got {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        expected: &'static str,
        value: String,
    },
    #[error("failed to prepare graph store: {0}")]
    Prepare(#[source] GraphStoreError),
    #[error("graph store failed at data row {row}: {source}")]
    Store {
        row: usize,
        source: GraphStoreError,
    },
}

/// A property mapping with its column resolved against the CSV header.
#[derive(Debug, Clone)]
struct ResolvedColumn {
    property: String,
    column: String,
    index: usize,
    kind: PropertyKind,
}

impl ResolvedColumn {
    fn extract(&self, row: usize, record: &StringRecord) -> Result<Property, LoadError> {
        let raw = record
            .get(self.index)
            .ok_or_else(|| LoadError::MissingColumn {
                row,
                column: self.column.clone(),
            })?;
        let value = match self.kind {
            PropertyKind::String => PropertyValue::String(raw.to_string()),
            PropertyKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(PropertyValue::Integer)
                .map_err(|_| self.invalid(row, raw))?,
            PropertyKind::Boolean => parse_flag(raw)
                .map(PropertyValue::Boolean)
                .ok_or_else(|| self.invalid(row, raw))?,
        };
        Ok(Property {
            name: self.property.clone(),
            value,
        })
    }

    fn invalid(&self, row: usize, raw: &str) -> LoadError {
        LoadError::InvalidValue {
            row,
            column: self.column.clone(),
            expected: self.kind.as_str(),
            value: raw.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct NodePlan {
    label: String,
    key: Vec<ResolvedColumn>,
    properties: Vec<ResolvedColumn>,
}

impl NodePlan {
    fn extract(&self, row: usize, record: &StringRecord) -> Result<NodeUpsert, LoadError> {
        let key = self
            .key
            .iter()
            .map(|c| c.extract(row, record))
            .collect::<Result<Vec<_>, _>>()?;
        let properties = self
            .properties
            .iter()
            .map(|c| c.extract(row, record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeUpsert {
            key: NodeKey::new(self.label.clone(), key),
            properties,
        })
    }
}

/// Schema bound to a concrete CSV header.
#[derive(Debug, Clone)]
struct RowPlan {
    nodes: Vec<NodePlan>,
    connection_columns: Option<(usize, usize)>,
}

impl RowPlan {
    fn new(schema: &LoadSchema, headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |column: &str| headers.iter().position(|h| h.trim() == column);
        let resolve = |mapping: &PropertyMapping| -> Result<ResolvedColumn, LoadError> {
            let index = position(&mapping.column).ok_or_else(|| LoadError::MissingHeader {
                schema: schema.name.clone(),
                column: mapping.column.clone(),
            })?;
            Ok(ResolvedColumn {
                property: mapping.property.clone(),
                column: mapping.column.clone(),
                index,
                kind: mapping.kind,
            })
        };

        let mut nodes = Vec::with_capacity(schema.nodes.len());
        for binding in &schema.nodes {
            nodes.push(NodePlan {
                label: binding.label.clone(),
                key: binding.key.iter().map(resolve).collect::<Result<_, _>>()?,
                properties: binding
                    .properties
                    .iter()
                    .map(resolve)
                    .collect::<Result<_, _>>()?,
            });
        }

        let connection_columns = position(CONNECTION_AIRPORT_COLUMN)
            .zip(position(CONNECTION_WAIT_COLUMN));

        Ok(Self {
            nodes,
            connection_columns,
        })
    }

    /// Origin airport of a passenger who waits for a connection.
    fn connecting_airport<'r>(&self, record: &'r StringRecord) -> Option<&'r str> {
        let (airport, wait) = self.connection_columns?;
        let wait: i64 = record.get(wait)?.trim().parse().ok()?;
        if wait > 0 {
            record.get(airport)
        } else {
            None
        }
    }
}

/// Applies a [`LoadSchema`] to CSV input against any [`GraphStore`].
pub struct GraphLoader<S: GraphStore> {
    store: S,
    schema: LoadSchema,
}

impl<S: GraphStore> GraphLoader<S> {
    pub fn new(store: S, schema: LoadSchema) -> Self {
        Self { store, schema }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn schema(&self) -> &LoadSchema {
        &self.schema
    }

    /// Declares one uniqueness constraint per label. Safe to repeat.
    pub async fn prepare(&self) -> Result<(), LoadError> {
        for constraint in self.schema.constraints() {
            log::debug!("Ensuring constraint {}", constraint.name());
            self.store
                .ensure_unique_constraint(&constraint)
                .await
                .map_err(LoadError::Prepare)?;
        }
        Ok(())
    }

    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Loading {} with schema `{}`",
            path.display(),
            self.schema.name
        );
        self.load_reader(file).await
    }

    pub async fn load_reader<R: Read>(&self, input: R) -> Result<LoadReport, LoadError> {
        let start = Instant::now();
        self.prepare().await?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let headers = reader
            .headers()
            .map_err(|source| LoadError::Csv { row: 0, source })?
            .clone();
        let plan = RowPlan::new(&self.schema, &headers)?;

        let mut report = LoadReport::new(self.schema.name.clone());
        let mut record = StringRecord::new();
        let mut row = 0;
        loop {
            let more = reader
                .read_record(&mut record)
                .map_err(|source| LoadError::Csv {
                    row: row + 1,
                    source,
                })?;
            if !more {
                break;
            }
            row += 1;
            self.load_row(row, &plan, &record, &mut report).await?;
            if row % 1000 == 0 {
                log::debug!("Loaded {} rows", row);
            }
        }

        report.elapsed = start.elapsed();
        report.log_summary();
        Ok(report)
    }

    async fn load_row(
        &self,
        row: usize,
        plan: &RowPlan,
        record: &StringRecord,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        let upserts = plan
            .nodes
            .iter()
            .map(|node| node.extract(row, record))
            .collect::<Result<Vec<_>, _>>()?;

        for upsert in &upserts {
            let outcome = self.store.upsert_node(upsert).await;
            settle(row, outcome, report)?;
            report.node_upserts += 1;
        }

        for binding in &self.schema.relationships {
            let upsert = RelationshipUpsert {
                rel_type: binding.rel_type.clone(),
                from: upserts[binding.from].key.clone(),
                to: upserts[binding.to].key.clone(),
            };
            let outcome = self.store.upsert_relationship(&upsert).await;
            settle(row, outcome, report)?;
            report.relationship_upserts += 1;
        }

        if let Some(airport) = plan.connecting_airport(record) {
            report.record_connection(airport);
        }
        report.rows += 1;
        Ok(())
    }
}

/// A uniqueness conflict means the entity already exists, which is the
/// desired end state of an upsert.
fn settle(
    row: usize,
    outcome: Result<(), GraphStoreError>,
    report: &mut LoadReport,
) -> Result<(), LoadError> {
    match outcome {
        Ok(()) => Ok(()),
        Err(e) if e.is_constraint_violation() => {
            log::debug!("Row {}: {} (already present)", row, e);
            report.constraint_conflicts += 1;
            Ok(())
        }
        Err(source) => Err(LoadError::Store { row, source }),
    }
}

/// Counts every label and relationship type the schema writes.
pub async fn summarize<S: GraphStore + ?Sized>(
    store: &S,
    schema: &LoadSchema,
) -> Result<GraphSummary, GraphStoreError> {
    let mut summary = GraphSummary::default();
    for label in schema.labels() {
        let count = store.count_nodes(label).await?;
        summary.nodes.insert(label.to_string(), count);
    }
    for rel_type in schema.relationship_types() {
        let count = store.count_relationships(rel_type).await?;
        summary.relationships.insert(rel_type.to_string(), count);
    }
    Ok(summary)
}
