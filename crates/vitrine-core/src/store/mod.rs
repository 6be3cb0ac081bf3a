//! Record fetching and permission seams.
//!
//! The engine suspends at every relationship fetch and pick-list lookup, so
//! both are behind an async trait object supplied when the engine is built.
//! Production deployments back [`RecordStore`] with their API layer; tests
//! and the CLI use the resident [`memory::MemoryStore`].

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, record::Record, schema::Relationship};

pub use memory::MemoryStore;

/// One entry of a pick list: a stored value and its display title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickListItem {
    /// Value as stored in the field
    pub value: String,
    /// Title shown in place of the value
    pub title: String,
}

/// A named mapping from stored values to display titles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickList {
    /// Pick list name, referenced from field definitions
    pub name: String,
    /// Ordered items
    #[serde(default)]
    pub items: Vec<PickListItem>,
}

impl PickList {
    /// Title of the item whose value equals `value`, if any.
    pub fn title_for(&self, value: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.title.as_str())
    }
}

/// Asynchronous access to records, related records, and pick lists.
///
/// Implementations may serve partial data: a truncated to-many collection is
/// a logged, non-fatal degradation on the implementation's side, not an
/// error. A genuine retrieval failure is the one error category the engine
/// propagates to top-level callers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fully fetch a record by table and id. `None` means absent or deleted.
    async fn fetch(&self, table: &str, id: i64) -> Result<Option<Record>>;

    /// Resolve a to-one relationship of `record`. `None` means unset.
    async fn related_one(
        &self,
        record: &Record,
        relationship: &Relationship,
    ) -> Result<Option<Record>>;

    /// Resolve a to-many relationship of `record` into its member records.
    async fn related_many(
        &self,
        record: &Record,
        relationship: &Relationship,
    ) -> Result<Vec<Record>>;

    /// Retrieve a pick list by name.
    async fn pick_list(&self, name: &str) -> Result<Option<PickList>>;
}

/// Synchronous read-permission predicates over tables and field paths.
pub trait PermissionGate: Send + Sync {
    /// Whether the caller may read records of `table`.
    fn can_read_table(&self, table: &str) -> bool;

    /// Whether the caller may read the dotted `path` rooted at `table`.
    fn can_read_path(&self, table: &str, path: &str) -> bool;
}

/// Permission gate that allows everything; the default when none is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn can_read_table(&self, _table: &str) -> bool {
        true
    }

    fn can_read_path(&self, _table: &str, _path: &str) -> bool {
        true
    }
}
