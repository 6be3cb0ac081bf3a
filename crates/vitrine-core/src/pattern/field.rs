//! Pattern field compiler.
//!
//! A pattern field is one fixed- or variable-width segment of a composite
//! identifier pattern (a catalog number, an accession number). Each kind is
//! one arm of a closed enum carrying only the parameters it needs, and every
//! arm yields a wildcard placeholder, a regex fragment, and a
//! canonicalization rule.

use jiff::{tz::TimeZone, Timestamp};
use serde::Deserialize;

use crate::error::{FormatError, Result};

/// Serde shape of one pattern field, compiled into a [`PatternField`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFieldSpec {
    /// Field kind: `constant`, `separator`, `alpha`, `numeric`, `year`,
    /// `alphanumeric`, `anychar`, `regex`, or `catalogNumberNumeric`
    pub kind: String,

    /// Width in characters; implied by the literal for constant/separator
    #[serde(default)]
    pub size: Option<usize>,

    /// Literal text (constant/separator) or wildcard placeholder
    #[serde(default)]
    pub value: Option<String>,

    /// Whether the field participates in autonumbering
    #[serde(default)]
    pub auto_increment: bool,

    /// Whether the field resets its autonumber sequence each year
    #[serde(default)]
    pub by_year: bool,

    /// Explicit regex, required for the `regex` kind
    #[serde(default)]
    pub pattern: Option<String>,
}

/// One compiled segment of a composite identifier pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternField {
    /// Fixed literal text
    Constant { value: String },
    /// Fixed literal text acting as a visual divider
    Separator { value: String },
    /// `size` letters
    Alpha { size: usize, value: String },
    /// `size` letters or digits
    Alphanumeric { size: usize, value: String },
    /// `size` arbitrary characters
    AnyChar { size: usize, value: String },
    /// Exactly `size` digits
    Numeric { size: usize, auto_increment: bool },
    /// A `size`-digit year, optionally restarting autonumber sequences
    Year {
        size: usize,
        value: String,
        by_year: bool,
    },
    /// An administrator-supplied regex, matched verbatim
    Regex {
        size: usize,
        value: String,
        pattern: String,
    },
    /// Up to `size` digits, zero-padded on canonicalization
    CatalogNumberNumeric { size: usize, auto_increment: bool },
}

impl PatternField {
    /// Compiles one field spec.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Configuration`] for an unrecognized kind or a
    /// missing/invalid parameter. This is the only point at which pattern
    /// configuration can fail; per-record formatting never does.
    pub fn compile(spec: &PatternFieldSpec) -> Result<Self> {
        let kind = spec.kind.to_ascii_lowercase();
        match kind.as_str() {
            "constant" | "separator" => {
                let value = spec.value.clone().filter(|v| !v.is_empty()).ok_or_else(|| {
                    FormatError::configuration(format!(
                        "pattern field kind '{}' requires a literal value",
                        spec.kind
                    ))
                })?;
                Ok(if kind == "constant" {
                    Self::Constant { value }
                } else {
                    Self::Separator { value }
                })
            }
            "alpha" | "alphanumeric" | "anychar" => {
                let size = required_size(spec)?;
                let value = placeholder(spec, size);
                Ok(match kind.as_str() {
                    "alpha" => Self::Alpha { size, value },
                    "alphanumeric" => Self::Alphanumeric { size, value },
                    _ => Self::AnyChar { size, value },
                })
            }
            "numeric" => Ok(Self::Numeric {
                size: required_size(spec)?,
                auto_increment: spec.auto_increment,
            }),
            "year" => Ok(Self::Year {
                size: required_size(spec)?,
                value: spec.value.clone().unwrap_or_else(|| "YEAR".to_string()),
                by_year: spec.by_year,
            }),
            "regex" => {
                let size = required_size(spec)?;
                let pattern = spec.pattern.clone().ok_or_else(|| {
                    FormatError::configuration(
                        "pattern field kind 'regex' requires an explicit pattern",
                    )
                })?;
                Ok(Self::Regex {
                    size,
                    value: placeholder(spec, size),
                    pattern,
                })
            }
            "catalognumbernumeric" => Ok(Self::CatalogNumberNumeric {
                size: required_size(spec)?,
                auto_increment: spec.auto_increment,
            }),
            other => Err(FormatError::configuration(format!(
                "unrecognized pattern field kind '{other}'"
            ))),
        }
    }

    /// The `size`-character wildcard placeholder shown for an empty value.
    pub fn wildcard(&self) -> String {
        match self {
            Self::Constant { value } | Self::Separator { value } => value.clone(),
            Self::Numeric { size, .. }
            | Self::Year { size, .. }
            | Self::CatalogNumberNumeric { size, .. } => "#".repeat(*size),
            Self::Alpha { value, .. }
            | Self::Alphanumeric { value, .. }
            | Self::AnyChar { value, .. }
            | Self::Regex { value, .. } => value.clone(),
        }
    }

    /// Regex fragment matching a valid (non-wildcard) value.
    pub fn value_fragment(&self) -> String {
        match self {
            Self::Constant { value } | Self::Separator { value } => regex::escape(value),
            Self::Alpha { size, .. } => format!("[a-zA-Z]{{{size}}}"),
            Self::Alphanumeric { size, .. } => format!("[a-zA-Z0-9]{{{size}}}"),
            Self::AnyChar { size, .. } => format!(".{{{size}}}"),
            Self::Numeric { size, .. } | Self::Year { size, .. } => format!("\\d{{{size}}}"),
            // Permits a partially-empty value, unlike plain numeric
            Self::CatalogNumberNumeric { size, .. } => format!("\\d{{0,{size}}}"),
            Self::Regex { pattern, .. } => pattern.clone(),
        }
    }

    /// Regex fragment matching either the wildcard or a valid value when the
    /// field supports autonumbering, else the valid-value fragment alone.
    pub fn fragment(&self) -> String {
        if self.can_autonumber() {
            format!("{}|{}", regex::escape(&self.wildcard()), self.value_fragment())
        } else {
            self.value_fragment()
        }
    }

    /// Canonical form of one captured value.
    ///
    /// Identity for most kinds; the catalog-number numeric kind left-pads
    /// with `'0'` to `size` unless the capture is empty (an empty capture is
    /// still a wildcard).
    pub fn canonicalize(&self, captured: &str) -> String {
        match self {
            Self::CatalogNumberNumeric { size, .. } if !captured.is_empty() => {
                format!("{captured:0>width$}", width = *size)
            }
            _ => captured.to_string(),
        }
    }

    /// Default value for an empty input: the literal `"YEAR"` resolves to the
    /// current four-digit year, anything else is used verbatim.
    pub fn default_value(&self) -> String {
        let value = match self {
            Self::Constant { value }
            | Self::Separator { value }
            | Self::Alpha { value, .. }
            | Self::Alphanumeric { value, .. }
            | Self::AnyChar { value, .. }
            | Self::Year { value, .. }
            | Self::Regex { value, .. } => value.clone(),
            Self::Numeric { .. } | Self::CatalogNumberNumeric { .. } => self.wildcard(),
        };
        if value == "YEAR" {
            format!("{:04}", current_year())
        } else {
            value
        }
    }

    /// Whether the field participates in autonumbering.
    pub fn can_autonumber(&self) -> bool {
        match self {
            Self::Numeric { auto_increment, .. }
            | Self::CatalogNumberNumeric { auto_increment, .. } => *auto_increment,
            Self::Year { by_year, .. } => *by_year,
            _ => false,
        }
    }

    /// Declared pattern text, present only for the regex kind.
    pub fn pattern_text(&self) -> Option<&str> {
        match self {
            Self::Regex { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}

fn required_size(spec: &PatternFieldSpec) -> Result<usize> {
    match spec.size {
        Some(size) if size > 0 => Ok(size),
        _ => Err(FormatError::configuration(format!(
            "pattern field kind '{}' requires a positive size",
            spec.kind
        ))),
    }
}

/// Configured wildcard placeholder, or a `#` run of the field's width.
fn placeholder(spec: &PatternFieldSpec, size: usize) -> String {
    spec.value
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "#".repeat(size))
}

fn current_year() -> i16 {
    Timestamp::now().to_zoned(TimeZone::UTC).year()
}
