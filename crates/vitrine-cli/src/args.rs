use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Main command-line interface for the Vitrine formatting engine
///
/// Vitrine turns relational records into human-legible display strings,
/// driven by per-table formatter and aggregator definitions and composite
/// identifier patterns. The CLI loads a schema, a definition set, and a
/// record dataset from JSON files and formats records from there.
#[derive(Parser)]
#[command(version, about, name = "vit")]
pub struct Args {
    /// Path to the schema JSON file
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Path to the formatter/aggregator/pattern definitions JSON file
    #[arg(long, global = true)]
    pub definitions: Option<PathBuf>,

    /// Path to the record dataset JSON file
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Vitrine CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Format one record into its display string
    #[command(alias = "f")]
    Format {
        /// Table the record belongs to
        table: String,
        /// Record id
        id: i64,
        /// Formatter definition name (defaults to the table's)
        #[arg(long)]
        formatter: Option<String>,
        /// Fall back to a naive "<label> #<id>" string when nothing else
        /// produces content
        #[arg(long)]
        try_best: bool,
    },
    /// Aggregate records of one table into a single joined string
    #[command(alias = "a")]
    Aggregate {
        /// Table the records belong to
        table: String,
        /// Record ids, in order
        ids: Vec<i64>,
        /// Aggregator definition name (defaults to the table's)
        #[arg(long)]
        aggregator: Option<String>,
    },
    /// Canonicalize a raw value against a named pattern formatter
    #[command(alias = "p")]
    Pattern {
        /// Pattern formatter name, e.g. CatalogNumberNumeric
        name: String,
        /// Raw value to parse and canonicalize
        value: String,
    },
}
