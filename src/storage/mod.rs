//! Document storage for the SWOT collections.
//!
//! Backends speak untyped JSON documents; [`Repository`] layers the typed
//! [`Record`] API on top so route handlers never touch raw documents.

mod loro_store;
mod mongo_store;

pub use loro_store::{LoroBackend, LoroStore};
pub use mongo_store::MongoStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::entity::{Action, Collection, PopulatedAction, Record, SwotEntry};
use crate::error::{Result, SwotError};

/// A stored document: a JSON object whose `_id` is the record id.
pub type Document = serde_json::Map<String, Value>;

/// Selection applied by [`DocumentBackend::find`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Top-level string field equals the value (e.g. `issueId`)
    FieldEq { field: &'static str, value: String },
    /// `_id` is one of the values
    IdIn(Vec<String>),
}

impl Filter {
    pub fn field_eq(field: &'static str, value: impl ToString) -> Self {
        Filter::FieldEq {
            field,
            value: value.to_string(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::FieldEq { field, value } => {
                document.get(*field).and_then(Value::as_str) == Some(value.as_str())
            }
            Filter::IdIn(ids) => document
                .get("_id")
                .and_then(Value::as_str)
                .is_some_and(|id| ids.iter().any(|candidate| candidate == id)),
        }
    }
}

/// Operations every document database backend provides.
///
/// Each call is a single document operation; there are no transactions.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<()>;

    async fn insert(&self, collection: Collection, document: Document) -> Result<()>;

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>>;

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>>;

    /// Overwrite the document with the same id. Returns false if absent.
    async fn replace(&self, collection: Collection, id: &str, document: Document) -> Result<bool>;

    /// Remove by id. Returns false if absent.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool>;
}

/// Typed access to the collections.
#[derive(Clone)]
pub struct Repository {
    backend: Arc<dyn DocumentBackend>,
}

impl Repository {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Repository over a fresh in-memory Loro document.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(LoroBackend::new(LoroStore::in_memory())))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn ping(&self) -> Result<()> {
        self.backend.ping().await
    }

    /// List records matching the filter, oldest first.
    pub async fn list<T: Record>(&self, filter: Filter) -> Result<Vec<T>> {
        let documents = self.backend.find(T::COLLECTION, &filter).await?;
        let mut records: Vec<T> = documents
            .into_iter()
            .filter_map(|document| match from_document::<T>(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(collection = %T::COLLECTION, error = %e, "skipping malformed document");
                    None
                }
            })
            .collect();
        records.sort_by_key(|r| r.created_at());
        Ok(records)
    }

    pub async fn get<T: Record>(&self, id: &Uuid) -> Result<Option<T>> {
        match self.backend.find_by_id(T::COLLECTION, &id.to_string()).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn insert<T: Record>(&self, record: &T) -> Result<()> {
        self.backend
            .insert(T::COLLECTION, to_document(record)?)
            .await
    }

    /// Persist changes to an existing record, refreshing `updatedAt`.
    /// Returns false if the record no longer exists.
    pub async fn save<T: Record>(&self, record: &mut T) -> Result<bool> {
        record.base_mut().touch();
        let id = record.id().to_string();
        self.backend
            .replace(T::COLLECTION, &id, to_document(record)?)
            .await
    }

    pub async fn delete<T: Record>(&self, id: &Uuid) -> Result<bool> {
        self.backend.delete(T::COLLECTION, &id.to_string()).await
    }

    /// Resolve an action's SWOT entry ids into documents.
    pub async fn populate(&self, action: Action) -> Result<PopulatedAction> {
        if action.swot_entries.is_empty() {
            return Ok(action.populate(&[]));
        }
        let ids = action.swot_entries.iter().map(Uuid::to_string).collect();
        let entries: Vec<SwotEntry> = self.list(Filter::IdIn(ids)).await?;
        Ok(action.populate(&entries))
    }
}

fn to_document<T: Record>(record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        other => Err(SwotError::Storage(format!(
            "{} record serialized to non-object JSON: {}",
            T::COLLECTION,
            other
        ))),
    }
}

fn from_document<T: Record>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
