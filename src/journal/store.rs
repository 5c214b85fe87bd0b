use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Document store keyed by owner + timestamp.
///
/// The journal treats persistence as an external collaborator with
/// read-after-write, order-preserving semantics. Documents are JSON
/// objects carrying at least an `owner` field and the field named by
/// `order_by`.
#[async_trait::async_trait]
pub trait DreamStore: Send + Sync {
    /// Insert a document and return its assigned id.
    async fn create(&self, collection: &str, document: Value) -> Result<String, StoreError>;

    /// All documents in `collection` belonging to `owner`, ordered by the
    /// named field.
    async fn query(
        &self,
        collection: &str,
        owner: &str,
        order_by: &str,
        descending: bool,
    ) -> Result<Vec<Value>, StoreError>;
}

/// In-process document store used by tests and local runs.
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DreamStore for MemoryStore {
    async fn create(&self, collection: &str, mut document: Value) -> Result<String, StoreError> {
        let object = document
            .as_object_mut()
            .ok_or_else(|| StoreError::Malformed("document must be an object".to_string()))?;

        let id = uuid::Uuid::new_v4().to_string();
        object.insert("id".to_string(), Value::String(id.clone()));

        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        owner: &str,
        order_by: &str,
        descending: bool,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.lock().await;
        let mut matches: Vec<Value> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.get("owner").and_then(Value::as_str) == Some(owner))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matches.sort_by(|a, b| {
            let ka = order_key(a.get(order_by));
            let kb = order_key(b.get(order_by));
            if descending {
                kb.cmp(&ka)
            } else {
                ka.cmp(&kb)
            }
        });

        Ok(matches)
    }
}

/// Ordering key for a document field. ISO dates and RFC 3339 timestamps
/// order correctly as strings.
fn order_key(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
