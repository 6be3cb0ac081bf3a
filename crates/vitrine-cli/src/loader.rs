//! Loading of schema, definition, and dataset JSON files.

use std::path::Path;

use anyhow::{Context, Result};
use vitrine_core::{store::MemoryStore, DefinitionsSpec, Schema};

/// Reads and parses the schema file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse schema file {}", path.display()))
}

/// Reads and parses the definitions file. A missing path means an empty
/// definition set: every table formats through its synthesized fallback.
pub fn load_definitions(path: Option<&Path>) -> Result<DefinitionsSpec> {
    let Some(path) = path else {
        return Ok(DefinitionsSpec::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read definitions file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse definitions file {}", path.display()))
}

/// Reads a dataset file into a resident record store. A missing path means
/// an empty store.
pub fn load_store(path: Option<&Path>) -> Result<MemoryStore> {
    let Some(path) = path else {
        return Ok(MemoryStore::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file {}", path.display()))?;
    MemoryStore::from_json(&text)
        .with_context(|| format!("Failed to parse dataset file {}", path.display()))
}
