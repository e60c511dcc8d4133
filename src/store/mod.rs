//! Document store abstraction
//!
//! Collections of JSON documents addressed by [`DocId`]. Two backends:
//! - [`MemoryStore`]: process-local, used by tests and database-less runs
//! - [`PgStore`]: PostgreSQL JSONB table
//!
//! Both enforce the configured [`UniqueField`]s on insert and update, and
//! apply list mutations ([`Update::Push`] / [`Update::Pull`]) atomically per
//! document.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use ulid::Ulid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Raw stored document (always a JSON object)
pub type Document = Map<String, Value>;

/// Key under which every stored document keeps its identifier
pub const ID_FIELD: &str = "_id";

// ============================================================================
// Identifiers
// ============================================================================

/// Document identifier (canonical ULID string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Parse a client-supplied identifier.
    ///
    /// Returns `None` when the value is not a syntactically valid ULID.
    /// Lower-case input is accepted and canonicalised.
    pub fn parse(raw: &str) -> Option<Self> {
        Ulid::from_string(raw).ok().map(|u| Self(u.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocId> for Value {
    fn from(id: DocId) -> Self {
        Value::String(id.0)
    }
}

// ============================================================================
// Filters and updates
// ============================================================================

/// Top-level field equality filter. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &DocId) -> Self {
        Self::new().eq(ID_FIELD, id.as_str())
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(k, v)| doc.get(k) == Some(v))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Single-document mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the given top-level fields, leaving the rest untouched
    Set(Document),
    /// Append `value` to the array at `field` (created if absent)
    Push { field: String, value: Value },
    /// Remove every element of the array at `field` that contains `matching`
    Pull { field: String, matching: Value },
}

/// Result of [`DocumentStore::update_by_id`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// A document with the identifier exists
    pub matched: bool,
    /// The document changed (for `Pull`: at least one element was removed)
    pub modified: bool,
}

/// JSON containment used by `Pull`: objects match when every key of
/// `pattern` is present with an equal value, anything else by equality.
pub(crate) fn contains(element: &Value, pattern: &Value) -> bool {
    match (element, pattern) {
        (Value::Object(e), Value::Object(p)) => p.iter().all(|(k, v)| e.get(k) == Some(v)),
        _ => element == pattern,
    }
}

/// A field whose value must be unique within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueField {
    pub collection: &'static str,
    pub field: &'static str,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate value for unique field `{field}` in `{collection}`")]
    Duplicate {
        collection: String,
        field: &'static str,
    },

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Document serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Store trait
// ============================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    async fn find_by_id(&self, collection: &str, id: &DocId) -> StoreResult<Option<Document>> {
        self.find_one(collection, &Filter::by_id(id)).await
    }

    /// All matching documents in insertion order
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Insert `fields` under a freshly generated identifier and return the
    /// stored document. Any `_id` in `fields` is replaced.
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<Document>;

    async fn update_by_id(
        &self,
        collection: &str,
        id: &DocId,
        update: Update,
    ) -> StoreResult<UpdateOutcome>;

    /// Returns whether a document was removed
    async fn delete_by_id(&self, collection: &str, id: &DocId) -> StoreResult<bool>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

// ============================================================================
// Typed collections
// ============================================================================

/// A document type stored in a named collection
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

/// Typed view over one collection of a [`DocumentStore`]
pub struct Collection<D> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<D: Record> Collection<D> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn find_one(&self, filter: &Filter) -> StoreResult<Option<D>> {
        self.store
            .find_one(D::COLLECTION, filter)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_by_id(&self, id: &DocId) -> StoreResult<Option<D>> {
        self.store
            .find_by_id(D::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find(&self, filter: &Filter) -> StoreResult<Vec<D>> {
        self.store
            .find(D::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn insert<N: Serialize + Sync>(&self, fields: &N) -> StoreResult<D> {
        let fields = match serde_json::to_value(fields)? {
            Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };
        decode(self.store.insert(D::COLLECTION, fields).await?)
    }

    pub async fn update_by_id(&self, id: &DocId, update: Update) -> StoreResult<UpdateOutcome> {
        self.store.update_by_id(D::COLLECTION, id, update).await
    }

    pub async fn delete_by_id(&self, id: &DocId) -> StoreResult<bool> {
        self.store.delete_by_id(D::COLLECTION, id).await
    }

    pub async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.store.count(D::COLLECTION, filter).await
    }
}

fn decode<D: DeserializeOwned>(doc: Document) -> StoreResult<D> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
