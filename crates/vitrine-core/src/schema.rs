//! Schema registry describing tables, fields, and relationships.
//!
//! The engine never reaches for an ambient global schema: a [`Schema`] is an
//! explicit, read-only registry injected when the engine is built, which also
//! makes it trivial to fabricate a minimal schema in tests.
//!
//! Table and field lookups are case-insensitive, matching the loose casing
//! that administrator-authored definitions use for paths like
//! `collector.agent.lastName`.

use serde::{Deserialize, Serialize};

/// Declared type of a literal (non-relationship) field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-form text
    #[default]
    Text,
    /// Whole numbers
    Integer,
    /// Fractional numbers
    Decimal,
    /// Calendar dates
    Date,
    /// True/false flags
    Boolean,
}

/// A literal field on a table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name, used in dotted paths
    pub name: String,

    /// Declared value type
    #[serde(default, rename = "type")]
    pub field_type: FieldType,

    /// Whether the field must be populated
    #[serde(default)]
    pub is_required: bool,

    /// Whether the field is hidden from normal views
    #[serde(default)]
    pub is_hidden: bool,

    /// Whether the field is read-only in forms
    #[serde(default)]
    pub is_read_only: bool,

    /// Whether the field is computed rather than stored
    #[serde(default)]
    pub is_virtual: bool,

    /// Name of the pattern formatter assigned to this field, if any
    #[serde(default)]
    pub formatter: Option<String>,

    /// Name of the pick list assigned to this field, if any
    #[serde(default)]
    pub pick_list: Option<String>,
}

/// Cardinality of a relationship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// Points at a single related record
    ToOne,
    /// Points at a collection of related records
    ToMany,
}

/// A relationship from one table to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Relationship name, used in dotted paths
    pub name: String,

    /// Name of the table the relationship points at
    pub related_table: String,

    /// Cardinality of the relationship
    pub kind: RelationshipKind,

    /// Whether related records are owned by this record
    #[serde(default)]
    pub is_dependent: bool,
}

impl Relationship {
    /// Whether the relationship points at a collection.
    pub fn is_to_many(&self) -> bool {
        self.kind == RelationshipKind::ToMany
    }
}

/// A table definition: label, fields, relationships, and assigned defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Canonical table name
    pub name: String,

    /// Human-readable label, used by the naive fallback string
    pub label: String,

    /// Name of the table's default formatter definition, if assigned
    #[serde(default)]
    pub format: Option<String>,

    /// Name of the table's default aggregator definition, if assigned
    #[serde(default)]
    pub aggregator: Option<String>,

    /// Literal fields
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Relationships to other tables
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Table {
    /// Look up a literal field by name, case-insensitively.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Look up a relationship by name, case-insensitively.
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Iterate over the literal text fields, the candidates for synthesized
    /// formatter fallbacks.
    pub fn literal_text_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| f.field_type == FieldType::Text)
    }
}

/// The full schema: every table known to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// All table definitions
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a schema from a list of tables.
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Look up a table by name, case-insensitively.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}
