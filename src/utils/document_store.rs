// csn-service/src/utils/document_store.rs
use crate::models::ServiceError;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// JSON document store: one file per document at <root>/<collection>/<id>.json
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ServiceError> {
        let root = root.into();
        if !root.exists() {
            info!("Creating storage directory: {}", root.display());
            fs::create_dir_all(&root).map_err(|e| {
                error!("Failed to create storage directory: {:?}", e);
                ServiceError::Unexpected
            })?;
        }

        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Serializes read-check-write sequences across requests. Not reentrant:
    // take it once per operation and only call the unlocked accessors below.
    pub fn lock(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.write_lock.lock().map_err(|e| {
            error!("Store lock poisoned: {:?}", e);
            ServiceError::Unexpected
        })
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn document_path(&self, collection: &str, id: &str) -> Option<PathBuf> {
        if !is_valid_id(id) {
            return None;
        }
        Some(self.collection_dir(collection).join(format!("{}.json", id)))
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, ServiceError> {
        let path = match self.document_path(collection, id) {
            Some(path) => path,
            None => return Ok(None),
        };

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read document {}/{}: {:?}", collection, id, e);
            ServiceError::Unexpected
        })?;

        let document = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse document {}/{}: {:?}", collection, id, e);
            ServiceError::Unexpected
        })?;

        Ok(Some(document))
    }

    pub fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, ServiceError> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry_result in fs::read_dir(&dir).map_err(|e| {
            error!("Failed to read collection {}: {:?}", collection, e);
            ServiceError::Unexpected
        })? {
            let entry = entry_result.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::Unexpected
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read document {:?}: {:?}", path, e);
                ServiceError::Unexpected
            })?;

            // An unreadable document fails the whole listing; lookups built on
            // it (email uniqueness) must not silently miss records
            let document = serde_json::from_str(&content).map_err(|e| {
                error!("Failed to parse document {:?}: {:?}", path, e);
                ServiceError::Unexpected
            })?;
            documents.push(document);
        }

        Ok(documents)
    }

    pub fn find<T, F>(&self, collection: &str, predicate: F) -> Result<Option<T>, ServiceError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        Ok(self.list(collection)?.into_iter().find(|doc| predicate(doc)))
    }

    // Write through a temp file and rename so readers never see a partial document
    pub fn save<T: Serialize>(&self, collection: &str, id: &str, document: &T) -> Result<(), ServiceError> {
        let path = self.document_path(collection, id).ok_or_else(|| {
            ServiceError::Validation(format!("Invalid document id: {}", id))
        })?;

        let dir = self.collection_dir(collection);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create collection {}: {:?}", collection, e);
                ServiceError::Unexpected
            })?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|e| {
            error!("Failed to serialize document {}/{}: {:?}", collection, id, e);
            ServiceError::Unexpected
        })?;

        let tmp_path = dir.join(format!(".{}.{}.tmp", id, Uuid::new_v4()));
        fs::write(&tmp_path, json).map_err(|e| {
            error!("Failed to write document {}/{}: {:?}", collection, id, e);
            ServiceError::Unexpected
        })?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            error!("Failed to commit document {}/{}: {:?}", collection, id, e);
            let _ = fs::remove_file(&tmp_path);
            ServiceError::Unexpected
        })?;

        debug!("Saved document {}/{}", collection, id);
        Ok(())
    }

    pub fn delete(&self, collection: &str, id: &str) -> Result<bool, ServiceError> {
        let path = match self.document_path(collection, id) {
            Some(path) => path,
            None => return Ok(false),
        };

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).map_err(|e| {
            error!("Failed to delete document {}/{}: {:?}", collection, id, e);
            ServiceError::Unexpected
        })?;

        debug!("Deleted document {}/{}", collection, id);
        Ok(true)
    }
}

// Ids become file names, so only a conservative character set is accepted
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Note {
        id: String,
        body: String,
    }

    fn temp_store() -> DocumentStore {
        let root = std::env::temp_dir().join(format!("csn-store-{}", Uuid::new_v4()));
        DocumentStore::open(root).unwrap()
    }

    #[test]
    fn saves_lists_and_deletes_documents() {
        let store = temp_store();
        let note = Note { id: "n1".to_string(), body: "hello".to_string() };
        store.save("notes", &note.id, &note).unwrap();
        store
            .save("notes", "n2", &Note { id: "n2".to_string(), body: "bye".to_string() })
            .unwrap();

        assert_eq!(store.get::<Note>("notes", "n1").unwrap(), Some(note));
        assert_eq!(store.list::<Note>("notes").unwrap().len(), 2);

        let found: Option<Note> = store.find("notes", |n: &Note| n.body == "bye").unwrap();
        assert_eq!(found.map(|n| n.id), Some("n2".to_string()));

        assert!(store.delete("notes", "n1").unwrap());
        assert!(!store.delete("notes", "n1").unwrap());
        assert_eq!(store.list::<Note>("notes").unwrap().len(), 1);

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn unsafe_ids_never_touch_the_filesystem() {
        let store = temp_store();
        assert_eq!(store.get::<Note>("notes", "../secrets").unwrap(), None);
        assert!(!store.delete("notes", "a/b").unwrap());

        let result = store.save("notes", "../escape", &Note { id: "x".into(), body: "y".into() });
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn unreadable_documents_fail_listing() {
        let store = temp_store();
        store
            .save("notes", "n1", &Note { id: "n1".to_string(), body: "fine".to_string() })
            .unwrap();
        fs::write(store.root().join("notes").join("n2.json"), r#"{"id": "n2"}"#).unwrap();

        assert_eq!(store.list::<Note>("notes").unwrap_err(), ServiceError::Unexpected);
        let found = store.find("notes", |n: &Note| n.body == "fine");
        assert_eq!(found.unwrap_err(), ServiceError::Unexpected);

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn missing_collection_lists_empty() {
        let store = temp_store();
        assert!(store.list::<Note>("nothing-here").unwrap().is_empty());
        fs::remove_dir_all(store.root()).unwrap();
    }
}
