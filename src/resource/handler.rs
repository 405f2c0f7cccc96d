//! Business-logic capability set for one resource kind.

use async_trait::async_trait;

use crate::resource::types::{AncestorIds, Outcome, Payload, QueryParameters, ResourceId};

/// CRUD capabilities of a resource.
///
/// Routes for a resource registered as `name` under prefix `P`:
///
/// * post:     `POST P/.../name`
/// * get:      `GET P/.../name/{id}`
/// * get_many: `GET P/.../name`
/// * put:      `PUT P/.../name/{id}`
/// * delete:   `DELETE P/.../name/{id}`
/// * options:  `OPTIONS` on any of the above
///
/// `ancestors` holds the ids of the enclosing resources, nearest first.
/// Every capability returns the full [`Outcome`]; a non-200 status or an
/// error is written to the client as plain text.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn post(&self, ancestors: &AncestorIds, body: Payload) -> Outcome;

    async fn get(&self, id: &ResourceId, ancestors: &AncestorIds) -> Outcome;

    async fn get_many(&self, ancestors: &AncestorIds, query: &QueryParameters) -> Outcome;

    async fn put(&self, id: &ResourceId, ancestors: &AncestorIds, body: Payload) -> Outcome;

    async fn delete(&self, id: &ResourceId, ancestors: &AncestorIds) -> Outcome;

    async fn options(&self) -> Outcome;
}
