//! In-process document store
//!
//! Each collection is a `Vec` of documents behind a `DashMap` entry, so a
//! mutation holds that collection's shard lock for its whole check-and-write.
//! Locks are never held across an `.await`.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{
    DocId, Document, DocumentStore, Filter, ID_FIELD, StoreError, StoreResult, UniqueField,
    Update, UpdateOutcome, contains,
};

pub struct MemoryStore {
    collections: DashMap<String, Vec<Document>>,
    unique: Vec<UniqueField>,
}

impl MemoryStore {
    pub fn new(unique: &[UniqueField]) -> Self {
        Self {
            collections: DashMap::new(),
            unique: unique.to_vec(),
        }
    }

    /// Reject `fields` if any unique field collides with a document other
    /// than `skip`.
    fn check_unique(
        &self,
        collection: &str,
        docs: &[Document],
        fields: &Document,
        skip: Option<&str>,
    ) -> StoreResult<()> {
        for unique in self.unique.iter().filter(|u| u.collection == collection) {
            let Some(value) = fields.get(unique.field) else {
                continue;
            };
            let taken = docs.iter().any(|doc| {
                doc.get(unique.field) == Some(value)
                    && skip.is_none_or(|id| doc.get(ID_FIELD).and_then(Value::as_str) != Some(id))
            });
            if taken {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: unique.field,
                });
            }
        }
        Ok(())
    }
}

fn has_id(doc: &Document, id: &DocId) -> bool {
    doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, mut fields: Document) -> StoreResult<Document> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        self.check_unique(collection, &docs, &fields, None)?;

        fields.insert(ID_FIELD.to_string(), DocId::generate().into());
        docs.push(fields.clone());
        Ok(fields)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &DocId,
        update: Update,
    ) -> StoreResult<UpdateOutcome> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };

        if let Update::Set(fields) = &update {
            self.check_unique(collection, &docs, fields, Some(id.as_str()))?;
        }

        let Some(doc) = docs.iter_mut().find(|d| has_id(d, id)) else {
            return Ok(UpdateOutcome::default());
        };

        let modified = match update {
            Update::Set(fields) => {
                for (key, value) in fields {
                    if key != ID_FIELD {
                        doc.insert(key, value);
                    }
                }
                true
            }
            Update::Push { field, value } => {
                let slot = doc.entry(field).or_insert_with(|| Value::Array(Vec::new()));
                if !slot.is_array() {
                    *slot = Value::Array(Vec::new());
                }
                if let Value::Array(items) = slot {
                    items.push(value);
                }
                true
            }
            Update::Pull { field, matching } => match doc.get_mut(&field) {
                Some(Value::Array(items)) => {
                    let before = items.len();
                    items.retain(|item| !contains(item, &matching));
                    items.len() != before
                }
                _ => false,
            },
        };

        Ok(UpdateOutcome {
            matched: true,
            modified,
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &DocId) -> StoreResult<bool> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(docs.len() != before)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const UNIQUE: &[UniqueField] = &[UniqueField {
        collection: "players",
        field: "name",
    }];

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_finds() {
        let store = MemoryStore::new(UNIQUE);
        let stored = store
            .insert("players", doc(json!({"name": "Dan Marino", "_id": "spoofed"})))
            .await
            .unwrap();

        let id = DocId::parse(stored["_id"].as_str().unwrap()).expect("generated ULID");
        let found = store.find_by_id("players", &id).await.unwrap().unwrap();
        assert_eq!(found["name"], "Dan Marino");
        assert_eq!(store.count("players", &Filter::new()).await.unwrap(), 1);
        assert!(store.find_by_id("users", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_field_rejected_on_insert_and_set() {
        let store = MemoryStore::new(UNIQUE);
        store
            .insert("players", doc(json!({"name": "Dan Marino"})))
            .await
            .unwrap();
        let other = store
            .insert("players", doc(json!({"name": "Jason Taylor"})))
            .await
            .unwrap();

        let err = store
            .insert("players", doc(json!({"name": "Dan Marino"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "name", .. }));

        let other_id = DocId::parse(other["_id"].as_str().unwrap()).unwrap();
        let err = store
            .update_by_id(
                "players",
                &other_id,
                Update::Set(doc(json!({"name": "Dan Marino"}))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // Re-setting a document's own value is not a collision
        let outcome = store
            .update_by_id(
                "players",
                &other_id,
                Update::Set(doc(json!({"name": "Jason Taylor", "team": "Dolphins"}))),
            )
            .await
            .unwrap();
        assert!(outcome.matched && outcome.modified);
    }

    #[tokio::test]
    async fn test_push_and_pull() {
        let store = MemoryStore::new(&[]);
        let stored = store
            .insert("players", doc(json!({"name": "Dan Marino"})))
            .await
            .unwrap();
        let id = DocId::parse(stored["_id"].as_str().unwrap()).unwrap();

        for cid in ["A", "B", "A"] {
            store
                .update_by_id(
                    "players",
                    &id,
                    Update::Push {
                        field: "comments".into(),
                        value: json!({"_id": cid}),
                    },
                )
                .await
                .unwrap();
        }

        let outcome = store
            .update_by_id(
                "players",
                &id,
                Update::Pull {
                    field: "comments".into(),
                    matching: json!({"_id": "A"}),
                },
            )
            .await
            .unwrap();
        assert!(outcome.modified);

        let found = store.find_by_id("players", &id).await.unwrap().unwrap();
        assert_eq!(found["comments"], json!([{"_id": "B"}]));

        let outcome = store
            .update_by_id(
                "players",
                &id,
                Update::Pull {
                    field: "comments".into(),
                    matching: json!({"_id": "Z"}),
                },
            )
            .await
            .unwrap();
        assert!(outcome.matched);
        assert!(!outcome.modified);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_document() {
        let store = MemoryStore::new(&[]);
        let id = DocId::generate();
        let outcome = store
            .update_by_id("players", &id, Update::Set(Document::new()))
            .await
            .unwrap();
        assert!(!outcome.matched);
        assert!(!store.delete_by_id("players", &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let store = MemoryStore::new(&[]);
        for name in ["c", "a", "b"] {
            store
                .insert("players", doc(json!({"name": name, "team": "Dolphins"})))
                .await
                .unwrap();
        }
        let names: Vec<_> = store
            .find("players", &Filter::new().eq("team", "Dolphins"))
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }
}
