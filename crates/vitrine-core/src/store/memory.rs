//! Resident record store backed by JSON datasets.

use std::collections::HashMap;

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::{PickList, RecordStore};
use crate::{
    error::{FormatError, Result},
    record::Record,
    schema::Relationship,
};

/// Serde shape of a dataset file: records grouped by table, plus pick lists.
///
/// Each record is a flat JSON object; an `id` member becomes the record id,
/// relationship members hold a related id (to-one) or an array of ids
/// (to-many).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSpec {
    /// Records keyed by table name
    #[serde(default)]
    pub records: HashMap<String, Vec<serde_json::Map<String, Value>>>,
    /// Pick lists served by the store
    #[serde(default)]
    pub pick_lists: Vec<PickList>,
}

/// In-memory [`RecordStore`] over a [`DatasetSpec`].
///
/// Serves as the fetch layer for the CLI and as the test double for the
/// engine's integration tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, Vec<Record>>,
    pick_lists: HashMap<String, PickList>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a deserialized dataset.
    pub fn from_dataset(dataset: DatasetSpec) -> Self {
        let mut store = Self::new();
        for (table, rows) in dataset.records {
            for row in rows {
                let id = row.get("id").and_then(Value::as_i64);
                let mut record = Record::new(table.clone(), id);
                for (key, value) in row {
                    if key != "id" {
                        record.values.insert(key, value);
                    }
                }
                store.insert(record);
            }
        }
        for list in dataset.pick_lists {
            store.add_pick_list(list);
        }
        store
    }

    /// Parses a dataset from JSON text and builds a store from it.
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: DatasetSpec = serde_json::from_str(json)?;
        Ok(Self::from_dataset(dataset))
    }

    /// Adds a record to the store.
    pub fn insert(&mut self, record: Record) {
        self.records
            .entry(record.table.to_ascii_lowercase())
            .or_default()
            .push(record);
    }

    /// Adds a pick list to the store.
    pub fn add_pick_list(&mut self, list: PickList) {
        self.pick_lists.insert(list.name.clone(), list);
    }

    fn lookup(&self, table: &str, id: i64) -> Option<&Record> {
        self.records
            .get(&table.to_ascii_lowercase())?
            .iter()
            .find(|r| r.id == Some(id))
    }

    fn related_id(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self, table: &str, id: i64) -> Result<Option<Record>> {
        Ok(self.lookup(table, id).cloned())
    }

    async fn related_one(
        &self,
        record: &Record,
        relationship: &Relationship,
    ) -> Result<Option<Record>> {
        let Some(value) = record.raw(&relationship.name) else {
            return Ok(None);
        };
        let Some(id) = Self::related_id(value) else {
            return Ok(None);
        };
        self.fetch(&relationship.related_table, id).await
    }

    async fn related_many(
        &self,
        record: &Record,
        relationship: &Relationship,
    ) -> Result<Vec<Record>> {
        let ids = match record.raw(&relationship.name) {
            Some(Value::Array(ids)) => ids.clone(),
            Some(other) => {
                return Err(FormatError::fetch(
                    format!("{}.{}", record.table, relationship.name),
                    format!("expected an id array, found {other}"),
                ))
            }
            None => return Ok(Vec::new()),
        };

        let mut members = Vec::with_capacity(ids.len());
        for id in ids.iter().filter_map(Self::related_id) {
            match self.lookup(&relationship.related_table, id) {
                Some(record) => members.push(record.clone()),
                // Incomplete collection: degrade, do not fail
                None => warn!(
                    "member {id} of {}.{} is missing from the dataset",
                    record.table, relationship.name
                ),
            }
        }
        Ok(members)
    }

    async fn pick_list(&self, name: &str) -> Result<Option<PickList>> {
        Ok(self.pick_lists.get(name).cloned())
    }
}
