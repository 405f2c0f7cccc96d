//! Path prefix handling.
//!
//! # Design Decisions
//! - Normalized prefix is either empty or `/a(/b)*`, never slash-terminated
//! - Prefix matching is case-sensitive and segment-aligned (`/api` does not
//!   match `/apis`)

/// Normalize a configured prefix: one leading slash, no trailing slash.
/// `""` and `"/"` both normalize to the empty prefix.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Strip a normalized `prefix` from a request path.
///
/// Returns the remainder (starting with `/`) only when at least one more
/// character follows `prefix/`. A path equal to the prefix, with or without
/// a trailing slash, yields `None`.
pub fn strip_prefix<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.len() > 1 && rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
