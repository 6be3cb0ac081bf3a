//! Composite identifier pattern machinery.
//!
//! Administrator-authored pattern strings (catalog numbers, accession
//! numbers) compile into regex-based parse/canonicalize/default-value
//! machines built from several pattern-field kinds:
//!
//! - [`field`]: one fixed- or variable-width segment, compiled from its
//!   declarative spec into a wildcard, a regex fragment, and a
//!   canonicalization rule
//! - [`composite`]: an ordered field sequence composed into one anchored
//!   value formatter
//!
//! Compilation happens once at engine build time; an invalid definition is a
//! configuration error there and never surfaces during per-record
//! formatting.

pub mod composite;
pub mod field;

pub use composite::{PatternFormatter, PatternFormatterSpec};
pub use field::{PatternField, PatternFieldSpec};
