use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use loro::{Container, LoroDoc, LoroList, LoroMap, LoroValue, ValueOrContainer};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{Document, DocumentBackend, Filter};
use crate::entity::Collection;
use crate::error::{Result, SwotError};

const DATA_FILE: &str = "swot.loro";

/// Collections kept in a single Loro document.
///
/// Every collection is a root map keyed by record id; each record is a nested
/// map, so concurrent edits to different fields merge instead of clobbering.
pub struct LoroStore {
    doc: LoroDoc,
    path: Option<PathBuf>,
}

impl LoroStore {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            doc: LoroDoc::new(),
            path: None,
        }
    }

    /// Open the store in `data_dir`, creating the directory and file on first use
    pub fn open_or_init(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DATA_FILE);

        let doc = LoroDoc::new();
        if path.exists() {
            let bytes = fs::read(&path)?;
            doc.import(&bytes)?;
        }

        let store = Self {
            doc,
            path: Some(path),
        };
        store.save()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save the document to disk. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        if let Some((path, bytes)) = self.snapshot()? {
            fs::write(path, bytes)?;
        }
        Ok(())
    }

    /// Export the current state along with the file it belongs in.
    fn snapshot(&self) -> Result<Option<(PathBuf, Vec<u8>)>> {
        match self.path {
            Some(ref path) => {
                let bytes = self.doc.export(loro::ExportMode::Snapshot)?;
                Ok(Some((path.clone(), bytes)))
            }
            None => Ok(None),
        }
    }

    pub fn insert_document(&self, collection: Collection, document: &Document) -> Result<()> {
        let id = document_id(document)?;
        let collection_map = self.doc.get_map(collection.name());
        let entity_map = collection_map.insert_container(id, LoroMap::new())?;
        write_map(&entity_map, document)?;
        self.commit()
    }

    pub fn get_document(&self, collection: Collection, id: &str) -> Option<Document> {
        let collection_map = self.doc.get_map(collection.name());
        match collection_map.get(id)? {
            ValueOrContainer::Container(Container::Map(entity)) => {
                as_document(loro_to_json(&entity.get_deep_value()))
            }
            _ => None,
        }
    }

    pub fn list_documents(&self, collection: Collection) -> Vec<Document> {
        let collection_map = self.doc.get_map(collection.name());
        let mut documents = Vec::new();

        if let LoroValue::Map(map) = collection_map.get_deep_value() {
            for (_, entity_value) in map.iter() {
                if let Some(document) = as_document(loro_to_json(entity_value)) {
                    documents.push(document);
                }
            }
        }

        documents
    }

    pub fn replace_document(
        &self,
        collection: Collection,
        id: &str,
        document: &Document,
    ) -> Result<bool> {
        let collection_map = self.doc.get_map(collection.name());
        if collection_map.get(id).is_none() {
            return Ok(false);
        }

        let entity_map = collection_map.insert_container(id, LoroMap::new())?;
        write_map(&entity_map, document)?;
        self.commit()?;
        Ok(true)
    }

    pub fn delete_document(&self, collection: Collection, id: &str) -> Result<bool> {
        let collection_map = self.doc.get_map(collection.name());
        if collection_map.get(id).is_none() {
            return Ok(false);
        }

        collection_map.delete(id)?;
        self.commit()?;
        Ok(true)
    }

    /// Commit pending edits in memory. Call [`LoroStore::save`] to persist.
    fn commit(&self) -> Result<()> {
        self.doc.commit();
        Ok(())
    }
}

fn document_id(document: &Document) -> Result<&str> {
    document
        .get("_id")
        .and_then(Value::as_str)
        .ok_or_else(|| SwotError::Storage("document has no string _id".to_string()))
}

fn as_document(value: Value) -> Option<Document> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn write_map(map: &LoroMap, document: &Document) -> Result<()> {
    for (key, value) in document {
        write_map_entry(map, key, value)?;
    }
    Ok(())
}

fn write_map_entry(map: &LoroMap, key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Object(object) => {
            let child = map.insert_container(key, LoroMap::new())?;
            write_map(&child, object)?;
        }
        Value::Array(items) => {
            let list = map.insert_container(key, LoroList::new())?;
            for item in items {
                push_list_item(&list, item)?;
            }
        }
        scalar => map.insert(key, scalar_to_loro(scalar))?,
    }
    Ok(())
}

fn push_list_item(list: &LoroList, value: &Value) -> Result<()> {
    match value {
        Value::Object(object) => {
            let child = list.insert_container(list.len(), LoroMap::new())?;
            write_map(&child, object)?;
        }
        Value::Array(items) => {
            let child = list.insert_container(list.len(), LoroList::new())?;
            for item in items {
                push_list_item(&child, item)?;
            }
        }
        scalar => list.push(scalar_to_loro(scalar))?,
    }
    Ok(())
}

fn scalar_to_loro(value: &Value) -> LoroValue {
    match value {
        Value::Bool(b) => LoroValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => LoroValue::I64(i),
            None => LoroValue::Double(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => LoroValue::from(s.as_str()),
        _ => LoroValue::Null,
    }
}

fn loro_to_json(value: &LoroValue) -> Value {
    match value {
        LoroValue::Null => Value::Null,
        LoroValue::Bool(b) => Value::Bool(*b),
        LoroValue::I64(n) => Value::from(*n),
        LoroValue::Double(d) => serde_json::Number::from_f64(*d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        LoroValue::String(s) => Value::String(s.to_string()),
        LoroValue::List(items) => Value::Array(items.iter().map(loro_to_json).collect()),
        LoroValue::Map(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_string(), loro_to_json(v)))
                .collect(),
        ),
        _ => Value::Null,
    }
}

/// [`DocumentBackend`] over a shared [`LoroStore`].
///
/// Every successful write is persisted before the call returns. The file
/// write runs on the blocking pool while the store lock is held, so
/// snapshots land in commit order.
pub struct LoroBackend {
    store: Mutex<LoroStore>,
}

impl LoroBackend {
    pub fn new(store: LoroStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

async fn write_snapshot(snapshot: Option<(PathBuf, Vec<u8>)>) -> Result<()> {
    let Some((path, bytes)) = snapshot else {
        return Ok(());
    };
    tokio::task::spawn_blocking(move || fs::write(path, bytes))
        .await
        .map_err(|e| SwotError::Storage(format!("snapshot write task failed: {}", e)))??;
    Ok(())
}

#[async_trait]
impl DocumentBackend for LoroBackend {
    fn name(&self) -> &'static str {
        "loro"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        let store = self.store.lock().await;
        store.insert_document(collection, &document)?;
        let snapshot = store.snapshot()?;
        write_snapshot(snapshot).await
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let store = self.store.lock().await;
        Ok(store.get_document(collection, id))
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        let store = self.store.lock().await;
        Ok(store
            .list_documents(collection)
            .into_iter()
            .filter(|document| filter.matches(document))
            .collect())
    }

    async fn replace(&self, collection: Collection, id: &str, document: Document) -> Result<bool> {
        let store = self.store.lock().await;
        let replaced = store.replace_document(collection, id, &document)?;
        if replaced {
            let snapshot = store.snapshot()?;
            write_snapshot(snapshot).await?;
        }
        Ok(replaced)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let store = self.store.lock().await;
        let deleted = store.delete_document(collection, id)?;
        if deleted {
            let snapshot = store.snapshot()?;
            write_snapshot(snapshot).await?;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn document(value: Value) -> Document {
        as_document(value).unwrap()
    }

    #[test]
    fn test_documents_round_trip_nested_values() {
        let store = LoroStore::in_memory();
        let original = document(json!({
            "_id": "a1",
            "title": "Expand",
            "count": 3,
            "ratio": 0.5,
            "done": false,
            "note": null,
            "swotEntries": ["s1", "s2"],
            "meta": {"tags": [{"k": "v"}]}
        }));
        store.insert_document(Collection::Actions, &original).unwrap();

        let fetched = store.get_document(Collection::Actions, "a1").unwrap();
        assert_eq!(Value::Object(fetched), Value::Object(original));
    }

    #[test]
    fn test_missing_document() {
        let store = LoroStore::in_memory();
        assert!(store.get_document(Collection::Issues, "nope").is_none());
        assert!(!store.delete_document(Collection::Issues, "nope").unwrap());
        assert!(!store
            .replace_document(Collection::Issues, "nope", &document(json!({"_id": "nope"})))
            .unwrap());
    }

    #[test]
    fn test_replace_drops_removed_fields() {
        let store = LoroStore::in_memory();
        store
            .insert_document(
                Collection::ActionSwotRelations,
                &document(json!({"_id": "r1", "reasoning": "because"})),
            )
            .unwrap();
        assert!(store
            .replace_document(
                Collection::ActionSwotRelations,
                "r1",
                &document(json!({"_id": "r1"})),
            )
            .unwrap());

        let fetched = store
            .get_document(Collection::ActionSwotRelations, "r1")
            .unwrap();
        assert!(fetched.get("reasoning").is_none());
    }

    #[test]
    fn test_collections_are_isolated() {
        let store = LoroStore::in_memory();
        store
            .insert_document(Collection::Goals, &document(json!({"_id": "x"})))
            .unwrap();
        assert!(store.get_document(Collection::Issues, "x").is_none());
        assert_eq!(store.list_documents(Collection::Goals).len(), 1);
        assert!(store.list_documents(Collection::Issues).is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let store = LoroStore::open_or_init(tmp.path()).unwrap();
            store
                .insert_document(
                    Collection::Issues,
                    &document(json!({"_id": "i1", "title": "Kept"})),
                )
                .unwrap();
            store.save().unwrap();
        }
        assert!(tmp.path().join(DATA_FILE).exists());

        let reopened = LoroStore::open_or_init(tmp.path()).unwrap();
        let fetched = reopened.get_document(Collection::Issues, "i1").unwrap();
        assert_eq!(fetched["title"], "Kept");
    }

    #[test]
    fn test_insert_requires_id() {
        let store = LoroStore::in_memory();
        let err = store
            .insert_document(Collection::Issues, &document(json!({"title": "x"})))
            .unwrap_err();
        assert!(matches!(err, SwotError::Storage(_)));
    }

    #[tokio::test]
    async fn test_backend_persists_each_write() {
        let tmp = TempDir::new().unwrap();
        let backend = LoroBackend::new(LoroStore::open_or_init(tmp.path()).unwrap());
        backend
            .insert(Collection::Issues, document(json!({"_id": "i1", "title": "First"})))
            .await
            .unwrap();
        backend
            .insert(Collection::Issues, document(json!({"_id": "i2", "title": "Second"})))
            .await
            .unwrap();
        assert!(backend.delete(Collection::Issues, "i1").await.unwrap());
        assert!(backend
            .replace(
                Collection::Issues,
                "i2",
                document(json!({"_id": "i2", "title": "Renamed"})),
            )
            .await
            .unwrap());

        // No explicit save: the backend wrote the file on every change
        let reopened = LoroStore::open_or_init(tmp.path()).unwrap();
        assert!(reopened.get_document(Collection::Issues, "i1").is_none());
        let fetched = reopened.get_document(Collection::Issues, "i2").unwrap();
        assert_eq!(fetched["title"], "Renamed");
    }
}
