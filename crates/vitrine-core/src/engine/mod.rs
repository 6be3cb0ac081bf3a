//! The recursive resource formatter and list aggregator.
//!
//! [`FormatterEngine`] is the heart of the crate: `format` walks a resolved
//! definition's field groups, dispatching to the pattern machinery, the leaf
//! formatter, and back into itself through relationships; `aggregate` formats
//! a collection of related records into one joined string. The two are
//! mutually recursive and guard against self-referential record graphs with
//! an explicit visited list.
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌──────────────┐
//! │  Definitions │    │ FormatterEngine│   │  RecordStore │
//! │  (resolved)  │───▶│ format/aggregate│─▶│ (async fetch)│
//! └──────────────┘    └───────────────┘    └──────────────┘
//!      metadata          traversal            data
//! ```
//!
//! Every top-level call is an independent logical control flow: guards are
//! created per call and passed by value down each branch, so concurrent
//! sibling branches never interfere with one another's cycle accounting.

mod aggregate;
pub mod builder;
mod format;

use std::sync::Arc;

use crate::{definitions::Definitions, record::Record, schema::Schema, store::PermissionGate};

pub use builder::FormatterEngineBuilder;

/// Fixed string shown in place of a field path the caller may not read.
pub const RESTRICTED: &str = "(restricted)";

/// The main formatting interface.
///
/// Built once from a schema, a compiled definition set, a record store, and
/// a permission gate; immutable and shareable thereafter. Independent
/// top-level calls run concurrently with zero coordination.
pub struct FormatterEngine {
    pub(crate) schema: Arc<Schema>,
    pub(crate) definitions: Arc<Definitions>,
    pub(crate) store: Arc<dyn crate::store::RecordStore>,
    pub(crate) permissions: Arc<dyn PermissionGate>,
}

impl std::fmt::Debug for FormatterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterEngine").finish_non_exhaustive()
    }
}

impl FormatterEngine {
    /// The schema the engine was built with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The compiled definitions the engine was built with.
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }
}

/// Append-only list of `(table, id)` pairs visited on the current recursion
/// path.
///
/// Passed by value to each recursive call, never shared across sibling
/// branches or across independent top-level calls, so a to-many fan-out
/// cannot falsely suppress a sibling's traversal.
#[derive(Debug, Clone, Default)]
pub struct CycleGuard(Vec<(String, i64)>);

impl CycleGuard {
    /// Whether `(table, id)` was already visited on this path.
    pub fn contains(&self, table: &str, id: i64) -> bool {
        self.0
            .iter()
            .any(|(t, i)| t.eq_ignore_ascii_case(table) && *i == id)
    }

    /// A new guard for a child branch with one more visited record. Records
    /// without an id cannot recur and are not tracked.
    pub(crate) fn child(&self, table: &str, id: Option<i64>) -> Self {
        let mut next = self.clone();
        if let Some(id) = id {
            next.0.push((table.to_string(), id));
        }
        next
    }
}

/// The naive best-effort fallback: `"<table label> #<id>"`, or
/// `"new <table label>"` for unsaved records.
pub(crate) fn naive_label(label: &str, record: &Record) -> String {
    match record.id {
        Some(id) => format!("{label} #{id}"),
        None => format!("new {label}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_guard_tracks_visits_per_branch() {
        let guard = CycleGuard::default();
        assert!(!guard.contains("Agent", 1));

        let child = guard.child("Agent", Some(1));
        assert!(child.contains("Agent", 1));
        assert!(child.contains("agent", 1));
        // The parent guard is untouched
        assert!(!guard.contains("Agent", 1));

        // Unsaved records are not tracked
        let child = guard.child("Agent", None);
        assert!(!child.contains("Agent", 1));
    }

    #[test]
    fn naive_labels() {
        assert_eq!(
            naive_label("Collection Object", &Record::new("CollectionObject", Some(17))),
            "Collection Object #17"
        );
        assert_eq!(
            naive_label("Collection Object", &Record::new("CollectionObject", None)),
            "new Collection Object"
        );
    }
}
