//! # Response Merging
//!
//! Flattens response entries into a status-keyed map and layers defaults under
//! the explicit declarations.

use crate::declaration::{ResponseDeclaration, ResponseEntry};
use indexmap::IndexMap;
use tracing::debug;

/// Flattens entries into a map keyed by status code.
///
/// A later declaration for the same code replaces the earlier one but keeps the
/// position of its first occurrence.
pub fn index_responses(entries: &[ResponseEntry]) -> IndexMap<u16, ResponseDeclaration> {
    let mut indexed = IndexMap::new();
    for decl in entries.iter().flat_map(ResponseEntry::declarations) {
        if indexed.insert(decl.status, decl.clone()).is_some() {
            debug!(status = decl.status, "response declaration replaced by a later one");
        }
    }
    indexed
}

/// Merges explicit responses with defaults. Explicit status codes suppress the
/// default for the same code; remaining defaults are appended in their order.
pub fn merge_responses(
    explicit: &[ResponseEntry],
    defaults: &[ResponseEntry],
) -> IndexMap<u16, ResponseDeclaration> {
    let mut merged = index_responses(explicit);
    for (status, decl) in index_responses(defaults) {
        if merged.contains_key(&status) {
            debug!(status, "default response overridden by explicit declaration");
            continue;
        }
        merged.insert(status, decl);
    }
    merged
}
