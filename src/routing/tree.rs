//! Resource path tree.
//!
//! # Responsibilities
//! - Register resource patterns (`grandparent/parent/child`)
//! - Resolve a prefix-stripped path to its handler, leaf id and ancestor ids
//!
//! # Design Decisions
//! - Every resource name is implicitly followed by an identifier slot, so a
//!   registered shape alternates `name/:id/name/:id/...`. The slot is not
//!   stored as a node: it is the edge between a node and its `children`.
//! - Built at startup, read-only afterwards (shared via `Arc` without locks)
//! - Ancestor ids are collected outer-to-inner and reversed once at the end

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::resource::{AncestorIds, ResourceHandler, ResourceId};

/// Errors raised while registering a resource pattern.
/// These are startup-time programming errors, never per-request ones.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Resource pattern is empty")]
    EmptyPattern,

    #[error("Resource pattern '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("Resource pattern '{0}' must start with a resource name")]
    LeadingPlaceholder(String),

    #[error("Resource pattern '{0}' must end with a resource name")]
    TrailingPlaceholder(String),

    #[error("Resource pattern '{0}' has two identifier placeholders in a row")]
    ConsecutivePlaceholders(String),
}

/// Outcome of a successful lookup.
pub struct Resolved {
    pub handler: Arc<dyn ResourceHandler>,
    /// Trailing identifier, empty for collection requests.
    pub resource_id: ResourceId,
    /// Identifiers consumed on the way down, nearest ancestor first.
    pub ancestor_ids: AncestorIds,
    /// Registered pattern of the matched resource, e.g. `parents/children`.
    pub pattern: Arc<str>,
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("pattern", &self.pattern)
            .field("resource_id", &self.resource_id)
            .field("ancestor_ids", &self.ancestor_ids)
            .finish()
    }
}

#[derive(Default)]
struct PathNode {
    /// Pattern of this node and its bound handler.
    handler: Option<(Arc<str>, Arc<dyn ResourceHandler>)>,
    /// Nested resources, reached through this node's identifier slot.
    children: HashMap<String, PathNode>,
}

/// Immutable-after-startup tree of registered resources.
#[derive(Default)]
pub struct PathTree {
    root: PathNode,
    routes: usize,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound resources.
    pub fn len(&self) -> usize {
        self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    /// Bind `handler` to the resource described by `pattern`.
    ///
    /// Both `parents/children` and `parents/:id/children` register the same
    /// resource. Intermediate resources are created without a handler.
    /// Registering the same pattern twice replaces the earlier handler.
    pub fn add_handler(
        &mut self,
        pattern: &str,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<(), RegistrationError> {
        let names = parse_pattern(pattern)?;
        let key: Arc<str> = Arc::from(names.join("/"));

        let mut node = &mut self.root;
        for name in &names {
            node = node.children.entry(name.to_string()).or_default();
        }

        match node.handler.replace((key.clone(), handler)) {
            Some(_) => {
                tracing::warn!(pattern = %key, "Resource registered twice, replacing previous handler");
            }
            None => {
                self.routes += 1;
                tracing::debug!(pattern = %key, "Resource registered");
            }
        }
        Ok(())
    }

    /// Resolve a prefix-stripped path such as `/parents/7/children/9`.
    ///
    /// Segments are percent-decoded. Returns `None` when no registered
    /// resource matches or a segment does not decode to UTF-8.
    pub fn find_handler(&self, path: &str) -> Option<Resolved> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return None;
        }

        // Split before decoding so an encoded `%2F` stays inside one segment.
        let segments = trimmed
            .split('/')
            .map(|s| {
                if s.is_empty() {
                    None
                } else {
                    percent_decode_str(s).decode_utf8().ok()
                }
            })
            .collect::<Option<Vec<Cow<'_, str>>>>()?;

        let mut node = &self.root;
        let mut ids = Vec::new();
        let mut rest = &segments[..];

        loop {
            let (name, tail) = rest.split_first()?;
            node = node.children.get(&**name)?;

            match tail {
                [] => return Self::resolved(node, ResourceId::none(), ids),
                [id] => return Self::resolved(node, ResourceId::from(&**id), ids),
                [id, deeper @ ..] => {
                    ids.push(ResourceId::from(&**id));
                    rest = deeper;
                }
            }
        }
    }

    fn resolved(node: &PathNode, resource_id: ResourceId, mut ids: AncestorIds) -> Option<Resolved> {
        let (pattern, handler) = node.handler.as_ref()?;
        ids.reverse();
        Some(Resolved {
            handler: handler.clone(),
            resource_id,
            ancestor_ids: ids,
            pattern: pattern.clone(),
        })
    }
}

/// Check that `pattern` is a well-formed resource pattern without
/// registering it.
pub fn validate_pattern(pattern: &str) -> Result<(), RegistrationError> {
    parse_pattern(pattern).map(|_| ())
}

/// Split a pattern into its resource names, dropping `:placeholder` slots.
fn parse_pattern(pattern: &str) -> Result<Vec<&str>, RegistrationError> {
    let trimmed = pattern.trim_matches('/');
    if trimmed.is_empty() {
        return Err(RegistrationError::EmptyPattern);
    }

    let mut names = Vec::new();
    let mut after_placeholder = false;
    for segment in trimmed.split('/') {
        if segment.is_empty() {
            return Err(RegistrationError::EmptySegment(pattern.to_string()));
        }
        if segment.starts_with(':') {
            if names.is_empty() {
                return Err(RegistrationError::LeadingPlaceholder(pattern.to_string()));
            }
            if after_placeholder {
                return Err(RegistrationError::ConsecutivePlaceholders(pattern.to_string()));
            }
            after_placeholder = true;
        } else {
            names.push(segment);
            after_placeholder = false;
        }
    }

    if after_placeholder {
        return Err(RegistrationError::TrailingPlaceholder(pattern.to_string()));
    }
    Ok(names)
}
