//! Formatter and aggregator definitions.
//!
//! These are the parsed shapes of the administrator-authored declarative
//! sources (parsing the raw sources themselves is out of scope). A
//! [`Definitions`] registry compiles every pattern formatter up front,
//! validates cross-references against the schema, and resolves requested
//! definitions by name, table default, or a synthesized fallback.

mod resolver;

use serde::{Deserialize, Serialize};

use crate::{
    error::{FormatError, Result},
    pattern::{PatternFormatter, PatternFormatterSpec},
    schema::{RelationshipKind, Schema},
};

/// One field entry of a formatter definition: a dotted path plus how to
/// render what the path reaches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntry {
    /// Dotted field path rooted at the owning table, e.g.
    /// `collector.agent.lastName`
    pub path: String,

    /// Separator prepended before this entry's contribution
    #[serde(default)]
    pub separator: String,

    /// Formatter name used when the path ends in a to-one relationship
    #[serde(default)]
    pub formatter: Option<String>,

    /// Aggregator name used when the path ends in a to-many relationship
    #[serde(default)]
    pub aggregator: Option<String>,

    /// Pattern formatter name overriding the leaf field's assigned one
    #[serde(default)]
    pub field_formatter: Option<String>,
}

/// One conditional branch of a formatter definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    /// Condition-field value selecting this group; the first group is the
    /// default when no value matches
    #[serde(default)]
    pub match_value: Option<String>,

    /// Ordered field entries
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// A named, per-table definition of how one record becomes a display string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Formatter {
    /// Unique definition name
    pub name: String,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Owning table
    pub table: String,

    /// Whether this is the table's default definition
    #[serde(default)]
    pub is_default: bool,

    /// Dotted path whose stringified value selects a field group
    #[serde(default)]
    pub condition_field: Option<String>,

    /// Conditional branches; exactly one is active per record
    #[serde(default)]
    pub field_groups: Vec<FieldGroup>,
}

impl Formatter {
    /// Selects the active field group for a condition value.
    ///
    /// With no condition field, or when the value is absent or matches no
    /// group, the first group is the default.
    pub fn active_group(&self, condition_value: Option<&str>) -> Option<&FieldGroup> {
        if self.condition_field.is_some() {
            if let Some(value) = condition_value {
                if let Some(group) = self
                    .field_groups
                    .iter()
                    .find(|g| g.match_value.as_deref() == Some(value))
                {
                    return Some(group);
                }
            }
        }
        self.field_groups.first()
    }
}

/// A named, per-table definition of how a list of related records becomes
/// one joined display string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Aggregator {
    /// Unique definition name
    pub name: String,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Owning table (the member table)
    pub table: String,

    /// Whether this is the table's default definition
    #[serde(default)]
    pub is_default: bool,

    /// Separator joining member strings
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Text appended after the joined members
    #[serde(default)]
    pub suffix: String,

    /// Maximum members formatted; absent or non-positive means unbounded
    #[serde(default)]
    pub limit: Option<i64>,

    /// Formatter name applied to each member
    #[serde(default)]
    pub formatter: Option<String>,

    /// Dotted path whose raw value orders members ascending
    #[serde(default)]
    pub sort_field: Option<String>,
}

impl Aggregator {
    /// The effective member cap, `None` when unbounded.
    pub fn effective_limit(&self) -> Option<usize> {
        match self.limit {
            Some(limit) if limit > 0 => Some(limit as usize),
            _ => None,
        }
    }
}

fn default_separator() -> String {
    "; ".to_string()
}

/// A requested formatter: by name, or an already-resolved definition.
#[derive(Debug, Clone)]
pub enum FormatterRef {
    /// Look the definition up by name
    Named(String),
    /// Use this definition as-is
    Inline(Formatter),
}

/// A requested aggregator: by name, or an already-resolved definition.
#[derive(Debug, Clone)]
pub enum AggregatorRef {
    /// Look the definition up by name
    Named(String),
    /// Use this definition as-is
    Inline(Aggregator),
}

/// Serde shape of a full definition set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionsSpec {
    /// Formatter definitions
    #[serde(default)]
    pub formatters: Vec<Formatter>,

    /// Aggregator definitions
    #[serde(default)]
    pub aggregators: Vec<Aggregator>,

    /// Composite pattern formatter definitions
    #[serde(default)]
    pub pattern_formatters: Vec<PatternFormatterSpec>,
}

/// Compiled, validated definition registry. Immutable after build.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    formatters: Vec<Formatter>,
    aggregators: Vec<Aggregator>,
    patterns: Vec<PatternFormatter>,
}

impl Definitions {
    /// Compiles a definition set against a schema.
    ///
    /// All pattern formatters compile here, duplicate names and dangling
    /// cross-references are rejected, and every declared field path is
    /// checked to resolve through the schema. Formatting never revisits any
    /// of these checks.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Configuration`] describing the first problem
    /// found.
    pub fn compile(spec: DefinitionsSpec, schema: &Schema) -> Result<Self> {
        let mut patterns = spec
            .pattern_formatters
            .iter()
            .map(PatternFormatter::compile)
            .collect::<Result<Vec<_>>>()?;
        if !patterns
            .iter()
            .any(|p| p.name().eq_ignore_ascii_case("CatalogNumberNumeric"))
        {
            patterns.push(PatternFormatter::catalog_number_numeric());
        }

        let definitions = Self {
            formatters: spec.formatters,
            aggregators: spec.aggregators,
            patterns,
        };
        definitions.validate(schema)?;
        Ok(definitions)
    }

    /// All formatter definitions.
    pub fn formatters(&self) -> &[Formatter] {
        &self.formatters
    }

    /// All aggregator definitions.
    pub fn aggregators(&self) -> &[Aggregator] {
        &self.aggregators
    }

    /// Look up a formatter definition by name.
    pub fn formatter_by_name(&self, name: &str) -> Option<&Formatter> {
        self.formatters
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Look up an aggregator definition by name.
    pub fn aggregator_by_name(&self, name: &str) -> Option<&Aggregator> {
        self.aggregators
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Look up a compiled pattern formatter by name.
    pub fn pattern(&self, name: &str) -> Option<&PatternFormatter> {
        self.patterns
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    fn validate(&self, schema: &Schema) -> Result<()> {
        check_unique("formatter", self.formatters.iter().map(|f| f.name.as_str()))?;
        check_unique(
            "aggregator",
            self.aggregators.iter().map(|a| a.name.as_str()),
        )?;
        check_unique("pattern formatter", self.patterns.iter().map(|p| p.name()))?;

        for formatter in &self.formatters {
            let table = schema.table(&formatter.table).ok_or_else(|| {
                FormatError::configuration(format!(
                    "formatter '{}' names unknown table '{}'",
                    formatter.name, formatter.table
                ))
            })?;
            if let Some(condition) = &formatter.condition_field {
                validate_path(schema, &table.name, condition)
                    .map_err(|e| in_definition("formatter", &formatter.name, e))?;
            }
            for group in &formatter.field_groups {
                for entry in &group.fields {
                    validate_path(schema, &table.name, &entry.path)
                        .map_err(|e| in_definition("formatter", &formatter.name, e))?;
                    if let Some(name) = &entry.formatter {
                        if self.formatter_by_name(name).is_none() {
                            return Err(dangling("formatter", &formatter.name, name));
                        }
                    }
                    if let Some(name) = &entry.aggregator {
                        if self.aggregator_by_name(name).is_none() {
                            return Err(dangling("aggregator", &formatter.name, name));
                        }
                    }
                    if let Some(name) = &entry.field_formatter {
                        if self.pattern(name).is_none() {
                            return Err(dangling("pattern formatter", &formatter.name, name));
                        }
                    }
                }
            }
        }

        for aggregator in &self.aggregators {
            let table = schema.table(&aggregator.table).ok_or_else(|| {
                FormatError::configuration(format!(
                    "aggregator '{}' names unknown table '{}'",
                    aggregator.name, aggregator.table
                ))
            })?;
            if let Some(name) = &aggregator.formatter {
                if self.formatter_by_name(name).is_none() {
                    return Err(dangling("formatter", &aggregator.name, name));
                }
            }
            if let Some(path) = &aggregator.sort_field {
                validate_path(schema, &table.name, path)
                    .map_err(|e| in_definition("aggregator", &aggregator.name, e))?;
            }
        }

        Ok(())
    }
}

fn check_unique<'a>(what: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        let lowered = name.to_ascii_lowercase();
        if seen.contains(&lowered) {
            return Err(FormatError::configuration(format!(
                "duplicate {what} name '{name}'"
            )));
        }
        seen.push(lowered);
    }
    Ok(())
}

fn in_definition(kind: &str, name: &str, err: FormatError) -> FormatError {
    FormatError::configuration(format!("in {kind} '{name}': {err}"))
}

fn dangling(kind: &str, definition: &str, name: &str) -> FormatError {
    FormatError::configuration(format!(
        "definition '{definition}' references unknown {kind} '{name}'"
    ))
}

/// Checks that a dotted path resolves through the schema: every segment but
/// the last must be a to-one relationship, the last may be a literal field
/// or a relationship of either cardinality.
fn validate_path(schema: &Schema, table: &str, path: &str) -> Result<()> {
    let mut current = schema
        .table(table)
        .ok_or_else(|| FormatError::configuration(format!("unknown table '{table}'")))?;
    let segments: Vec<&str> = path.split('.').collect();
    for (index, segment) in segments.iter().enumerate() {
        let last = index == segments.len() - 1;
        if let Some(relationship) = current.relationship(segment) {
            if !last && relationship.kind == RelationshipKind::ToMany {
                return Err(FormatError::configuration(format!(
                    "path '{path}' traverses to-many relationship '{segment}' before its end"
                )));
            }
            if !last {
                current = schema.table(&relationship.related_table).ok_or_else(|| {
                    FormatError::configuration(format!(
                        "relationship '{segment}' points at unknown table '{}'",
                        relationship.related_table
                    ))
                })?;
            }
        } else if last && current.field(segment).is_some() {
            // literal leaf
        } else {
            return Err(FormatError::configuration(format!(
                "path '{path}' does not resolve: '{segment}' is not a field of '{}'",
                current.name
            )));
        }
    }
    Ok(())
}

pub use resolver::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, Relationship, Table};

    fn text_field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            field_type: FieldType::Text,
            is_required: false,
            is_hidden: false,
            is_read_only: false,
            is_virtual: false,
            formatter: None,
            pick_list: None,
        }
    }

    fn schema() -> Schema {
        Schema::new(vec![
            Table {
                name: "Agent".to_string(),
                label: "Agent".to_string(),
                format: None,
                aggregator: None,
                fields: vec![text_field("lastName"), text_field("firstName")],
                relationships: vec![Relationship {
                    name: "organization".to_string(),
                    related_table: "Agent".to_string(),
                    kind: RelationshipKind::ToOne,
                    is_dependent: false,
                }],
            },
        ])
    }

    fn formatter(name: &str, path: &str) -> Formatter {
        Formatter {
            name: name.to_string(),
            title: String::new(),
            table: "Agent".to_string(),
            is_default: false,
            condition_field: None,
            field_groups: vec![FieldGroup {
                match_value: None,
                fields: vec![FieldEntry {
                    path: path.to_string(),
                    separator: String::new(),
                    formatter: None,
                    aggregator: None,
                    field_formatter: None,
                }],
            }],
        }
    }

    #[test]
    fn compiles_and_serves_builtin_catalog_pattern() {
        let definitions = Definitions::compile(DefinitionsSpec::default(), &schema()).unwrap();
        let pattern = definitions.pattern("CatalogNumberNumeric").unwrap();
        assert!(pattern.is_system());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let spec = DefinitionsSpec {
            formatters: vec![formatter("Agent", "lastName"), formatter("agent", "firstName")],
            aggregators: vec![],
            pattern_formatters: vec![],
        };
        assert!(Definitions::compile(spec, &schema()).is_err());
    }

    #[test]
    fn dangling_paths_are_rejected() {
        let spec = DefinitionsSpec {
            formatters: vec![formatter("Agent", "middleName")],
            aggregators: vec![],
            pattern_formatters: vec![],
        };
        assert!(Definitions::compile(spec, &schema()).is_err());
    }

    #[test]
    fn nested_paths_resolve_through_relationships() {
        let spec = DefinitionsSpec {
            formatters: vec![formatter("Agent", "organization.lastName")],
            aggregators: vec![],
            pattern_formatters: vec![],
        };
        assert!(Definitions::compile(spec, &schema()).is_ok());
    }

    #[test]
    fn active_group_matches_condition_values() {
        let definition = Formatter {
            name: "Preparation".to_string(),
            title: String::new(),
            table: "Agent".to_string(),
            is_default: false,
            condition_field: Some("lastName".to_string()),
            field_groups: vec![
                FieldGroup {
                    match_value: None,
                    fields: vec![],
                },
                FieldGroup {
                    match_value: Some("special".to_string()),
                    fields: vec![],
                },
            ],
        };
        assert_eq!(
            definition.active_group(Some("special")).unwrap().match_value,
            Some("special".to_string())
        );
        // Unmatched and absent values default to the first group
        assert!(definition.active_group(Some("other")).unwrap().match_value.is_none());
        assert!(definition.active_group(None).unwrap().match_value.is_none());
    }
}
