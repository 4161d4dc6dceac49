use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DocumentStore, DocumentStoreError};
use crate::record::FlightRecord;
use crate::server::aggregation::MonthlyTravelQuery;
use crate::server::models::{MonthlyCount, StoredFlight};

/// Process-local flight collection. Ids are 24 hex digits, like ObjectIds.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    flights: RwLock<Vec<StoredFlight>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.flights.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flights.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<StoredFlight> {
        self.flights
            .read()
            .await
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_flight(
        &self,
        flight: &FlightRecord,
    ) -> Result<StoredFlight, DocumentStoreError> {
        let mut flights = self.flights.write().await;
        let stored = StoredFlight {
            id: format!("{:024x}", flights.len() + 1),
            flight: flight.clone(),
        };
        flights.push(stored.clone());
        Ok(stored)
    }

    async fn monthly_travel(
        &self,
        query: &MonthlyTravelQuery,
    ) -> Result<Vec<MonthlyCount>, DocumentStoreError> {
        let flights = self.flights.read().await;
        Ok(query.evaluate(flights.iter().map(|f| &f.flight)))
    }
}
