//! HTTP method to resource capability dispatch.

use hyper::{Method, StatusCode};
use thiserror::Error;

use crate::resource::{AncestorIds, Outcome, Payload, QueryParameters, ResourceHandler, ResourceId};

/// Requests the dispatcher refuses before reaching the handler.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("POST requests must not provide an ID")]
    PostWithId,

    #[error("PUT method must provide an ID")]
    PutWithoutId,

    #[error("DELETE method must provide an ID")]
    DeleteWithoutId,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<DispatchError> for Outcome {
    fn from(e: DispatchError) -> Self {
        Outcome::error(e.status(), e)
    }
}

/// Invoke the capability of `handler` selected by `method`.
///
/// | Method  | id         | capability |
/// |---------|------------|------------|
/// | OPTIONS | ignored    | `options`  |
/// | POST    | must be empty | `post`  |
/// | GET     | present    | `get`      |
/// | GET     | empty      | `get_many` |
/// | PUT     | required   | `put`      |
/// | DELETE  | required   | `delete`   |
///
/// Anything else is `405 Method not allowed`. `body` and `query` are passed
/// through untouched.
pub async fn handle_resource(
    method: &Method,
    id: &ResourceId,
    ancestors: &AncestorIds,
    body: Payload,
    query: &QueryParameters,
    handler: &dyn ResourceHandler,
) -> Outcome {
    match *method {
        Method::OPTIONS => handler.options().await,
        Method::POST => {
            if !id.is_empty() {
                return DispatchError::PostWithId.into();
            }
            handler.post(ancestors, body).await
        }
        Method::GET => {
            if id.is_empty() {
                handler.get_many(ancestors, query).await
            } else {
                handler.get(id, ancestors).await
            }
        }
        Method::PUT => {
            if id.is_empty() {
                return DispatchError::PutWithoutId.into();
            }
            handler.put(id, ancestors, body).await
        }
        Method::DELETE => {
            if id.is_empty() {
                return DispatchError::DeleteWithoutId.into();
            }
            handler.delete(id, ancestors).await
        }
        _ => DispatchError::MethodNotAllowed.into(),
    }
}
