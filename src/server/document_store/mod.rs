//! Flight document storage behind the HTTP service.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::aggregation::MonthlyTravelQuery;
use super::models::{MonthlyCount, StoredFlight};
use crate::record::FlightRecord;

pub mod memory;
pub mod mongo;

pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("document store unavailable: {0}")]
    Connection(String),
    #[error("failed to encode flight document: {0}")]
    Encode(String),
    #[error("insert failed: {0}")]
    Insert(String),
    #[error("inserted document {id} could not be read back")]
    NotFound { id: String },
    #[error("aggregation failed: {0}")]
    Aggregate(String),
    #[error("failed to decode stored document: {0}")]
    Decode(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts one flight and returns it as stored, `_id` included.
    async fn insert_flight(&self, flight: &FlightRecord)
        -> Result<StoredFlight, DocumentStoreError>;

    async fn monthly_travel(
        &self,
        query: &MonthlyTravelQuery,
    ) -> Result<Vec<MonthlyCount>, DocumentStoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn insert_flight(
        &self,
        flight: &FlightRecord,
    ) -> Result<StoredFlight, DocumentStoreError> {
        (**self).insert_flight(flight).await
    }

    async fn monthly_travel(
        &self,
        query: &MonthlyTravelQuery,
    ) -> Result<Vec<MonthlyCount>, DocumentStoreError> {
        (**self).monthly_travel(query).await
    }
}
