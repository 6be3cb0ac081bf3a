//! Composite pattern formatter: an ordered field sequence compiled into one
//! parse/canonicalize/default-value machine.

use regex::Regex;
use serde::Deserialize;

use super::field::{PatternField, PatternFieldSpec};
use crate::error::{FormatError, Result};

/// Serde shape of a composite pattern formatter definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFormatterSpec {
    /// Unique formatter name, referenced from field definitions
    pub name: String,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Owning table, if the formatter is table-specific
    #[serde(default)]
    pub table: Option<String>,

    /// Whether the formatter is built in rather than administrator-authored
    #[serde(default)]
    pub is_system: bool,

    /// Ordered field segments
    pub fields: Vec<PatternFieldSpec>,
}

/// A compiled composite pattern formatter.
///
/// Its anchored parse regex is the ordered concatenation of each field's
/// fragment, one capture group per field, so a successful parse yields
/// exactly one capture per field for positional canonicalization.
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    name: String,
    title: String,
    table: Option<String>,
    is_system: bool,
    fields: Vec<PatternField>,
    parse_regex: Regex,
}

impl PatternFormatter {
    /// Compiles a formatter spec, compiling each field and the combined
    /// anchored regex.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Configuration`] if any field fails to compile
    /// or the combined regex is invalid.
    pub fn compile(spec: &PatternFormatterSpec) -> Result<Self> {
        let fields = spec
            .fields
            .iter()
            .map(PatternField::compile)
            .collect::<Result<Vec<_>>>()?;
        Self::from_fields(
            spec.name.clone(),
            spec.title.clone().unwrap_or_else(|| spec.name.clone()),
            spec.table.clone(),
            spec.is_system,
            fields,
        )
    }

    fn from_fields(
        name: String,
        title: String,
        table: Option<String>,
        is_system: bool,
        fields: Vec<PatternField>,
    ) -> Result<Self> {
        let mut source = String::from("^");
        for field in &fields {
            source.push('(');
            source.push_str(&field.fragment());
            source.push(')');
        }
        source.push('$');
        let parse_regex = Regex::new(&source).map_err(|e| {
            FormatError::configuration(format!("pattern formatter '{name}' is invalid: {e}"))
        })?;
        Ok(Self {
            name,
            title,
            table,
            is_system,
            fields,
            parse_regex,
        })
    }

    /// The built-in default identifier formatter: a single catalog-number
    /// numeric field of size 9. Used whenever an administrator has not
    /// assigned one of their own.
    pub fn catalog_number_numeric() -> Self {
        Self::from_fields(
            "CatalogNumberNumeric".to_string(),
            "Catalog Number".to_string(),
            None,
            true,
            vec![PatternField::CatalogNumberNumeric {
                size: 9,
                auto_increment: true,
            }],
        )
        .expect("built-in catalog number pattern always compiles")
    }

    /// Formatter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Owning table, if table-specific.
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Whether the formatter is built in.
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// The compiled field segments.
    pub fn fields(&self) -> &[PatternField] {
        &self.fields
    }

    /// The fully wildcarded placeholder shown for an empty autonumbered
    /// input: the concatenation of each field's default value.
    pub fn value_or_wild(&self) -> String {
        self.fields.iter().map(PatternField::default_value).collect()
    }

    /// Parses a raw value against the anchored regex, returning the ordered
    /// per-field captures. Partial matches are rejected.
    pub fn parse(&self, raw: &str) -> Option<Vec<String>> {
        let captures = self.parse_regex.captures(raw)?;
        Some(
            (1..=self.fields.len())
                .map(|i| {
                    captures
                        .get(i)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    /// Maps each capture through its field's canonicalization and
    /// concatenates. Returns `None` unless exactly one capture per field is
    /// supplied.
    pub fn canonicalize(&self, captures: &[String]) -> Option<String> {
        if captures.len() != self.fields.len() {
            return None;
        }
        Some(
            self.fields
                .iter()
                .zip(captures)
                .map(|(field, capture)| field.canonicalize(capture))
                .collect(),
        )
    }

    /// Parses then canonicalizes; `None` if the raw value does not match.
    pub fn format(&self, raw: &str) -> Option<String> {
        self.canonicalize(&self.parse(raw)?)
    }

    /// Whether any field supports autonumbering.
    pub fn can_autonumber(&self) -> bool {
        self.fields.iter().any(PatternField::can_autonumber)
    }

    /// Human-readable concatenation of each field's declared pattern text,
    /// or `None` when no field declares one.
    pub fn pattern(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .fields
            .iter()
            .filter_map(PatternField::pattern_text)
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}
