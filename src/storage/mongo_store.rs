use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Client, Database};
use serde_json::Value;

use super::{Document, DocumentBackend, Filter};
use crate::entity::Collection;
use crate::error::{Result, SwotError};

/// Database used when the connection string names none.
const DEFAULT_DATABASE: &str = "test";

/// MongoDB backend. Documents are stored with their string `_id` unchanged.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect and ping, so an unreachable server fails here rather than on the first request.
    pub async fn connect(uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        let store = Self { client, database };
        store.ping().await?;
        tracing::info!(database = %store.database.name(), "MongoDB connected successfully");
        Ok(store)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<bson::Document> {
        self.database.collection::<bson::Document>(collection.name())
    }
}

fn id_filter(id: &str) -> bson::Document {
    doc! { "_id": id }
}

fn to_bson_filter(filter: &Filter) -> bson::Document {
    match filter {
        Filter::All => bson::Document::new(),
        Filter::FieldEq { field, value } => {
            let mut query = bson::Document::new();
            query.insert(*field, value.as_str());
            query
        }
        Filter::IdIn(ids) => doc! { "_id": { "$in": ids.clone() } },
    }
}

fn to_bson(document: Document) -> Result<bson::Document> {
    bson::to_document(&Value::Object(document))
        .map_err(|e| SwotError::Storage(format!("Failed to encode document: {}", e)))
}

fn from_bson(document: bson::Document) -> Result<Document> {
    let value: Value = bson::from_document(document)
        .map_err(|e| SwotError::Storage(format!("Failed to decode document: {}", e)))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SwotError::Storage(format!(
            "Stored document is not an object: {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentBackend for MongoStore {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        self.collection(collection).insert_one(to_bson(document)?).await?;
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        match self.collection(collection).find_one(id_filter(id)).await? {
            Some(document) => Ok(Some(from_bson(document)?)),
            None => Ok(None),
        }
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        let cursor = self.collection(collection).find(to_bson_filter(filter)).await?;
        let documents: Vec<bson::Document> = cursor.try_collect().await?;
        documents.into_iter().map(from_bson).collect()
    }

    async fn replace(&self, collection: Collection, id: &str, document: Document) -> Result<bool> {
        let result = self
            .collection(collection)
            .replace_one(id_filter(id), to_bson(document)?)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let result = self.collection(collection).delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
