use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query};

use super::cypher::{self, Statement};
use super::{
    GraphStore, GraphStoreError, NodeUpsert, PropertyValue, RelationshipUpsert, UniqueConstraint,
};
use crate::config::GraphStoreConfig;

/// Status code Neo4j reports when a write breaks a uniqueness constraint.
const CONSTRAINT_VALIDATION_CODE: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

/// Message fragments for failures that arrive without a structured code.
const CONSTRAINT_ERROR_MARKERS: [&str; 2] = ["ConstraintValidationFailed", "already exists with"];

/// Graph store backed by a Neo4j server over Bolt.
///
/// `neo4rs::Graph` is a connection pool; each statement checks out a
/// connection for its own duration and returns it immediately, so there are
/// no long-lived sessions and no transactions spanning statements.
pub struct Neo4jGraphStore {
    graph: Graph,
}

impl Neo4jGraphStore {
    pub async fn connect(config: &GraphStoreConfig) -> Result<Self, GraphStoreError> {
        log::info!(
            "Connecting to Neo4j at {} (database={}, user={})",
            config.uri,
            config.database,
            config.user
        );

        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| GraphStoreError::Unavailable(e.to_string()))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphStoreError::Unavailable(e.to_string()))?;

        log::info!("✓ Connected to Neo4j");
        Ok(Self { graph })
    }

    async fn run(&self, label: &str, statement: Statement) -> Result<(), GraphStoreError> {
        log::trace!("cypher: {}", statement.text);
        let q = bind_all(query(&statement.text), &statement.params);
        self.graph.run(q).await.map_err(|e| classify(label, e))
    }

    async fn fetch_count(&self, text: String) -> Result<u64, GraphStoreError> {
        let mut stream = self
            .graph
            .execute(query(&text))
            .await
            .map_err(|e| classify("", e))?;

        match stream.next().await.map_err(|e| classify("", e))? {
            Some(row) => count_from(row.get::<i64>("total")),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn ensure_unique_constraint(
        &self,
        constraint: &UniqueConstraint,
    ) -> Result<(), GraphStoreError> {
        let text = cypher::constraint_statement(constraint);
        log::debug!("Ensuring constraint: {}", text);
        self.graph
            .run(query(&text))
            .await
            .map_err(|e| classify(&constraint.label, e))
    }

    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), GraphStoreError> {
        self.run(&node.key.label, cypher::node_upsert_statement(node))
            .await
    }

    async fn upsert_relationship(
        &self,
        relationship: &RelationshipUpsert,
    ) -> Result<(), GraphStoreError> {
        self.run(
            &relationship.rel_type,
            cypher::relationship_upsert_statement(relationship),
        )
        .await
    }

    async fn count_nodes(&self, label: &str) -> Result<u64, GraphStoreError> {
        self.fetch_count(cypher::count_nodes_statement(label)).await
    }

    async fn count_relationships(&self, rel_type: &str) -> Result<u64, GraphStoreError> {
        self.fetch_count(cypher::count_relationships_statement(rel_type))
            .await
    }
}

fn bind_all(mut q: Query, params: &[(String, PropertyValue)]) -> Query {
    for (name, value) in params {
        q = match value {
            PropertyValue::String(s) => q.param(name, s.as_str()),
            PropertyValue::Integer(i) => q.param(name, *i),
            PropertyValue::Boolean(b) => q.param(name, *b),
        };
    }
    q
}

fn count_from<E: std::fmt::Display>(total: Result<i64, E>) -> Result<u64, GraphStoreError> {
    let total = total.map_err(|e| GraphStoreError::Query(format!("unreadable count: {}", e)))?;
    Ok(total.max(0) as u64)
}

fn classify(label: &str, err: neo4rs::Error) -> GraphStoreError {
    let message = err.to_string();
    let structured = match &err {
        neo4rs::Error::Neo4j(e) => Some(is_constraint_code(e.code())),
        _ => None,
    };
    if structured.unwrap_or_else(|| is_constraint_message(&message)) {
        return GraphStoreError::ConstraintViolation {
            label: label.to_string(),
            message,
        };
    }
    match err {
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            GraphStoreError::Unavailable(message)
        }
        _ => GraphStoreError::Query(message),
    }
}

fn is_constraint_code(code: &str) -> bool {
    code == CONSTRAINT_VALIDATION_CODE
}

fn is_constraint_message(message: &str) -> bool {
    CONSTRAINT_ERROR_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
