//! Property-graph store abstraction.
//!
//! Every write is a single atomic upsert: nodes are merged by their key
//! properties, relationships by `(type, from, to)`. The store is the only
//! source of truth for existence; callers never cache what was created.
//!
//! Backends:
//! - [`neo4j::Neo4jGraphStore`]: Bolt connection via `neo4rs`
//! - [`memory::InMemoryGraphStore`]: process-local store used for dry runs and
//!   tests, with the same MERGE and uniqueness semantics

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod cypher;
pub mod memory;
pub mod neo4j;

pub use memory::InMemoryGraphStore;
pub use neo4j::Neo4jGraphStore;

#[derive(Debug, Error)]
pub enum GraphStoreError {
    /// A create collided with an existing node under a uniqueness constraint.
    /// The entity already exists; loaders treat this as success.
    #[error("uniqueness constraint violated for `{label}`: {message}")]
    ConstraintViolation { label: String, message: String },
    #[error("graph store unavailable: {0}")]
    Unavailable(String),
    #[error("graph store query failed: {0}")]
    Query(String),
}

impl GraphStoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, GraphStoreError::ConstraintViolation { .. })
    }
}

/// Scalar property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{:?}", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Identity of a node: its label plus the values of its key properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub label: String,
    pub properties: Vec<Property>,
}

impl NodeKey {
    pub fn new(label: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            label: label.into(),
            properties,
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.label)?;
        for (i, p) in self.properties.iter().enumerate() {
            let sep = if i == 0 { " {" } else { ", " };
            write!(f, "{}{}: {}", sep, p.name, p.value)?;
        }
        if !self.properties.is_empty() {
            write!(f, "}}")?;
        }
        write!(f, ")")
    }
}

/// Create-if-absent node write. `properties` are set only when the node is
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUpsert {
    pub key: NodeKey,
    pub properties: Vec<Property>,
}

/// Merge of a directed relationship between two existing nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipUpsert {
    pub rel_type: String,
    pub from: NodeKey,
    pub to: NodeKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueConstraint {
    pub label: String,
    pub properties: Vec<String>,
}

impl UniqueConstraint {
    pub fn new(label: impl Into<String>, properties: Vec<String>) -> Self {
        Self {
            label: label.into(),
            properties,
        }
    }

    /// Stable constraint name, e.g. `unique_flight_flight_id`.
    pub fn name(&self) -> String {
        let mut name = format!("unique_{}", self.label.to_lowercase());
        for property in &self.properties {
            name.push('_');
            name.push_str(&property.to_lowercase());
        }
        name
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Idempotently declares a uniqueness constraint.
    async fn ensure_unique_constraint(
        &self,
        constraint: &UniqueConstraint,
    ) -> Result<(), GraphStoreError>;

    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), GraphStoreError>;

    /// No-op when either endpoint is missing.
    async fn upsert_relationship(
        &self,
        relationship: &RelationshipUpsert,
    ) -> Result<(), GraphStoreError>;

    async fn count_nodes(&self, label: &str) -> Result<u64, GraphStoreError>;

    async fn count_relationships(&self, rel_type: &str) -> Result<u64, GraphStoreError>;
}

#[async_trait]
impl<T: GraphStore + ?Sized> GraphStore for Arc<T> {
    async fn ensure_unique_constraint(
        &self,
        constraint: &UniqueConstraint,
    ) -> Result<(), GraphStoreError> {
        (**self).ensure_unique_constraint(constraint).await
    }

    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), GraphStoreError> {
        (**self).upsert_node(node).await
    }

    async fn upsert_relationship(
        &self,
        relationship: &RelationshipUpsert,
    ) -> Result<(), GraphStoreError> {
        (**self).upsert_relationship(relationship).await
    }

    async fn count_nodes(&self, label: &str) -> Result<u64, GraphStoreError> {
        (**self).count_nodes(label).await
    }

    async fn count_relationships(&self, rel_type: &str) -> Result<u64, GraphStoreError> {
        (**self).count_relationships(rel_type).await
    }
}
