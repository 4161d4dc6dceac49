use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document, to_document, Bson, Document};
use mongodb::{Client, Collection};

use super::{DocumentStore, DocumentStoreError};
use crate::config::DocumentStoreConfig;
use crate::record::FlightRecord;
use crate::server::aggregation::MonthlyTravelQuery;
use crate::server::models::{MonthlyCount, StoredFlight};

pub struct MongoDocumentStore {
    collection: Collection<Document>,
}

impl MongoDocumentStore {
    /// Connects and pings the database so a bad URI fails at startup rather
    /// than on the first request.
    pub async fn connect(config: &DocumentStoreConfig) -> Result<Self, DocumentStoreError> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| DocumentStoreError::Connection(e.to_string()))?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DocumentStoreError::Connection(e.to_string()))?;
        log::info!(
            "Connected to MongoDB database `{}`, collection `{}`",
            config.database,
            config.collection
        );
        Ok(Self {
            collection: database.collection::<Document>(&config.collection),
        })
    }
}

/// Splits `_id` off a stored document.
fn into_stored_flight(mut document: Document) -> Result<StoredFlight, DocumentStoreError> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s,
        Some(other) => other.to_string(),
        None => return Err(DocumentStoreError::Decode("document has no _id".to_string())),
    };
    let flight: FlightRecord =
        from_document(document).map_err(|e| DocumentStoreError::Decode(e.to_string()))?;
    Ok(StoredFlight { id, flight })
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert_flight(
        &self,
        flight: &FlightRecord,
    ) -> Result<StoredFlight, DocumentStoreError> {
        let document =
            to_document(flight).map_err(|e| DocumentStoreError::Encode(e.to_string()))?;
        let inserted = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| DocumentStoreError::Insert(e.to_string()))?;
        log::debug!("Inserted flight {} as {}", flight.id, inserted.inserted_id);

        let stored = self
            .collection
            .find_one(doc! { "_id": inserted.inserted_id.clone() })
            .await
            .map_err(|e| DocumentStoreError::Insert(e.to_string()))?
            .ok_or_else(|| DocumentStoreError::NotFound {
                id: inserted.inserted_id.to_string(),
            })?;
        into_stored_flight(stored)
    }

    async fn monthly_travel(
        &self,
        query: &MonthlyTravelQuery,
    ) -> Result<Vec<MonthlyCount>, DocumentStoreError> {
        let mut cursor = self
            .collection
            .aggregate(query.pipeline())
            .await
            .map_err(|e| DocumentStoreError::Aggregate(e.to_string()))?;

        let mut counts = Vec::new();
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|e| DocumentStoreError::Aggregate(e.to_string()))?
        {
            let count: MonthlyCount =
                from_document(row).map_err(|e| DocumentStoreError::Decode(e.to_string()))?;
            counts.push(count);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn stored_document() -> Document {
        doc! {
            "id": "FLAB12CD34",
            "airline": "Alaska",
            "from": "SJC",
            "to": "PDX",
            "day": 2,
            "month": 11,
            "year": 2022,
            "age": 27,
            "gender": "male",
            "reason": "Business/Work",
            "stay": "Hotel",
            "transit": "Uber",
            "connection": "False",
            "wait": 0,
            "passenger_id": "PASSAB12CD",
        }
    }

    #[test]
    fn test_object_id_becomes_hex() {
        let oid = ObjectId::new();
        let mut document = stored_document();
        document.insert("_id", oid);
        let stored = into_stored_flight(document).unwrap();
        assert_eq!(stored.id, oid.to_hex());
        assert_eq!(stored.flight.month, 11);
        assert!(!stored.flight.connection);
    }

    #[test]
    fn test_missing_id_is_a_decode_error() {
        assert!(matches!(
            into_stored_flight(stored_document()),
            Err(DocumentStoreError::Decode(_))
        ));
    }

    #[test]
    fn test_round_trip_through_bson() {
        let mut document = stored_document();
        document.insert("connection", true);
        let flight: FlightRecord = from_document(document).unwrap();
        let encoded = to_document(&flight).unwrap();
        assert!(encoded.get_bool("connection").unwrap());
        assert_eq!(encoded.get_i32("wait").unwrap(), 0);
    }

    #[test]
    fn test_group_row_decodes() {
        let row = doc! { "_id": 6, "total_times": 3 };
        let count: MonthlyCount = from_document(row).unwrap();
        assert_eq!(count, MonthlyCount { month: 6, total_times: 3 });
    }
}
