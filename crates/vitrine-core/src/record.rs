//! In-memory representation of a fetched resource.

use std::collections::BTreeMap;

use serde_json::Value;

/// A single relational record: its table, optional id, and resident field
/// values.
///
/// Relationship columns hold the related record id (to-one) or an array of
/// ids (to-many); the [`crate::store::RecordStore`] resolves those into
/// records. A record with no id is "new" (never persisted), which matters
/// for the naive fallback string and for cycle accounting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Name of the table the record belongs to
    pub table: String,

    /// Persistent id, absent for new records
    pub id: Option<i64>,

    /// Resident field values keyed by field name
    pub values: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record for a table.
    pub fn new(table: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            table: table.into(),
            id,
            values: BTreeMap::new(),
        }
    }

    /// Sets a field value, builder style.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Raw value of a field, case-insensitive on the field name.
    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(field))
            .map(|(_, v)| v)
    }

    /// Stringified value of a field: strings verbatim, numbers and booleans
    /// via their display form. Null and absent values are `None`.
    pub fn raw_string(&self, field: &str) -> Option<String> {
        stringify(self.raw(field)?)
    }
}

/// Stringify a raw JSON value the way condition fields and sort keys see it.
pub(crate) fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Arrays and objects have no scalar string form
        _ => None,
    }
}
