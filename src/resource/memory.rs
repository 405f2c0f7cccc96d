//! In-memory JSON document store implementing [`ResourceHandler`].
//!
//! # Responsibilities
//! - Keep one collection per ancestor scope (`/parents/1/children` and
//!   `/parents/2/children` never see each other's documents)
//! - Assign sequential numeric ids on create
//! - Serve list requests with an optional `limit` query parameter
//!
//! Used by the `resource-gateway` binary as a demo backend and by the
//! integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use hyper::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::resource::handler::ResourceHandler;
use crate::resource::types::{AncestorIds, Outcome, Payload, QueryParameters, ResourceId};

/// Methods a memory resource answers to, as reported by OPTIONS.
pub const ALLOWED_METHODS: &str = "OPTIONS, POST, GET, PUT, DELETE";

#[derive(Serialize)]
struct Created {
    id: String,
}

#[derive(Serialize)]
struct Entry<'a> {
    id: String,
    value: &'a Value,
}

#[derive(Default)]
struct Collection {
    next_id: u64,
    documents: BTreeMap<u64, Value>,
}

/// Thread-safe document store for one resource kind.
pub struct MemoryResource {
    name: String,
    scopes: RwLock<HashMap<AncestorIds, Collection>>,
}

impl MemoryResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents stored under `ancestors`.
    pub fn len(&self, ancestors: &AncestorIds) -> usize {
        self.scopes
            .read()
            .expect("memory resource lock poisoned")
            .get(ancestors)
            .map(|c| c.documents.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, ancestors: &AncestorIds) -> bool {
        self.len(ancestors) == 0
    }
}

fn parse_id(id: &ResourceId) -> Result<u64, Outcome> {
    id.as_str()
        .parse()
        .map_err(|_| Outcome::error(StatusCode::BAD_REQUEST, format!("Invalid id: {}", id)))
}

fn parse_document(body: &Payload) -> Result<Value, Outcome> {
    serde_json::from_slice(body).map_err(|e| {
        Outcome::error(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    })
}

fn json_outcome<T: Serialize>(value: &T) -> Outcome {
    match serde_json::to_vec(value) {
        Ok(json) => Outcome::ok(json),
        Err(e) => Outcome::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("can't create json response: {}", e),
        ),
    }
}

#[async_trait]
impl ResourceHandler for MemoryResource {
    async fn post(&self, ancestors: &AncestorIds, body: Payload) -> Outcome {
        let document = match parse_document(&body) {
            Ok(d) => d,
            Err(outcome) => return outcome,
        };

        let id = {
            let mut scopes = self.scopes.write().expect("memory resource lock poisoned");
            let collection = scopes.entry(ancestors.clone()).or_default();
            collection.next_id += 1;
            let id = collection.next_id;
            collection.documents.insert(id, document);
            id
        };

        tracing::debug!(resource = %self.name, id, "Document created");
        json_outcome(&Created { id: id.to_string() })
    }

    async fn get(&self, id: &ResourceId, ancestors: &AncestorIds) -> Outcome {
        let key = match parse_id(id) {
            Ok(k) => k,
            Err(outcome) => return outcome,
        };

        let scopes = self.scopes.read().expect("memory resource lock poisoned");
        match scopes.get(ancestors).and_then(|c| c.documents.get(&key)) {
            Some(document) => json_outcome(document),
            None => Outcome::status(StatusCode::NOT_FOUND),
        }
    }

    async fn get_many(&self, ancestors: &AncestorIds, query: &QueryParameters) -> Outcome {
        let limit = match query.get("limit").map(str::parse::<usize>) {
            None => usize::MAX,
            Some(Ok(limit)) => limit,
            Some(Err(_)) => {
                return Outcome::error(StatusCode::BAD_REQUEST, "limit must be a non-negative integer")
            }
        };

        let scopes = self.scopes.read().expect("memory resource lock poisoned");
        let entries: Vec<Entry<'_>> = scopes
            .get(ancestors)
            .map(|c| {
                c.documents
                    .iter()
                    .take(limit)
                    .map(|(id, value)| Entry {
                        id: id.to_string(),
                        value,
                    })
                    .collect()
            })
            .unwrap_or_default();

        json_outcome(&entries)
    }

    async fn put(&self, id: &ResourceId, ancestors: &AncestorIds, body: Payload) -> Outcome {
        let key = match parse_id(id) {
            Ok(k) => k,
            Err(outcome) => return outcome,
        };
        let document = match parse_document(&body) {
            Ok(d) => d,
            Err(outcome) => return outcome,
        };

        let mut scopes = self.scopes.write().expect("memory resource lock poisoned");
        match scopes
            .get_mut(ancestors)
            .and_then(|c| c.documents.get_mut(&key))
        {
            Some(existing) => {
                *existing = document;
                Outcome::ok(Payload::new())
            }
            None => Outcome::status(StatusCode::NOT_FOUND),
        }
    }

    async fn delete(&self, id: &ResourceId, ancestors: &AncestorIds) -> Outcome {
        let key = match parse_id(id) {
            Ok(k) => k,
            Err(outcome) => return outcome,
        };

        let mut scopes = self.scopes.write().expect("memory resource lock poisoned");
        match scopes
            .get_mut(ancestors)
            .and_then(|c| c.documents.remove(&key))
        {
            Some(_) => Outcome::ok(Payload::new()),
            None => Outcome::status(StatusCode::NOT_FOUND),
        }
    }

    async fn options(&self) -> Outcome {
        Outcome::ok(ALLOWED_METHODS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(ids: &[&str]) -> AncestorIds {
        ids.iter().map(|id| ResourceId::from(*id)).collect()
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let store = MemoryResource::new("widgets");
        let root = scope(&[]);

        let created = store.post(&root, Payload::from(r#"{"color":"red"}"#)).await;
        assert_eq!(created.status, StatusCode::OK);
        assert_eq!(&created.payload[..], br#"{"id":"1"}"#);

        let fetched = store.get(&ResourceId::from("1"), &root).await;
        assert!(fetched.is_success());
        assert_eq!(&fetched.payload[..], br#"{"color":"red"}"#);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let store = MemoryResource::new("children");
        store.post(&scope(&["1"]), Payload::from("1")).await;
        store.post(&scope(&["1"]), Payload::from("2")).await;
        store.post(&scope(&["2"]), Payload::from("3")).await;

        assert_eq!(store.len(&scope(&["1"])), 2);
        assert_eq!(store.len(&scope(&["2"])), 1);
        assert!(store.is_empty(&scope(&["3"])));

        let missing = store.get(&ResourceId::from("2"), &scope(&["2"])).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_honours_limit() {
        let store = MemoryResource::new("widgets");
        let root = scope(&[]);
        for n in 0..3 {
            store.post(&root, Payload::from(n.to_string())).await;
        }

        let mut query = QueryParameters::new();
        query.insert("limit", "2");
        let listed = store.get_many(&root, &query).await;
        assert!(listed.is_success());
        let json: Value = serde_json::from_slice(&listed.payload).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["id"], "1");
        assert_eq!(json[1]["value"], 1);

        query = QueryParameters::new();
        query.insert("limit", "lots");
        let rejected = store.get_many(&root, &query).await;
        assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryResource::new("widgets");
        let root = scope(&[]);
        store.post(&root, Payload::from("true")).await;
        let id = ResourceId::from("1");

        let updated = store.put(&id, &root, Payload::from("false")).await;
        assert!(updated.is_success());
        assert_eq!(&store.get(&id, &root).await.payload[..], b"false");

        let unknown = store.put(&ResourceId::from("9"), &root, Payload::from("1")).await;
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);

        assert!(store.delete(&id, &root).await.is_success());
        assert_eq!(store.delete(&id, &root).await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let store = MemoryResource::new("widgets");
        let root = scope(&[]);

        let bad_body = store.post(&root, Payload::from("{not json")).await;
        assert_eq!(bad_body.status, StatusCode::BAD_REQUEST);
        assert!(bad_body.error.unwrap().to_string().starts_with("Invalid JSON body"));

        let bad_id = store.get(&ResourceId::from("abc"), &root).await;
        assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad_id.error.unwrap().to_string(), "Invalid id: abc");
    }
}
