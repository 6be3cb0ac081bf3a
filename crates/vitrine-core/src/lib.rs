//! Core library for the Vitrine resource formatting engine.
//!
//! Vitrine converts raw relational records, and chains of records reached
//! through relationships, into human-legible display strings, driven by
//! per-table formatter and aggregator definitions plus a pattern compiler
//! for fixed-width identifier fields such as catalog numbers.
//!
//! # Architecture
//!
//! - **Schema** ([`schema`]): an explicit read-only registry of tables,
//!   fields, and relationships, injected at engine build time
//! - **Pattern machinery** ([`pattern`]): compiles administrator-authored
//!   pattern strings into regex-based parse/canonicalize/default machines
//! - **Definitions** ([`definitions`]): formatter and aggregator shapes with
//!   name/default/fallback resolution
//! - **Leaf formatting** ([`leaf`]): one literal field's raw value through
//!   pattern formatter, pick list, and generic type parsing, in that order
//! - **Engine** ([`engine`]): the mutually recursive `format`/`aggregate`
//!   pair, with cycle guarding and concurrent fan-out over collections
//!
//! The record fetch layer and the permission predicates are injected traits
//! ([`store`]), so the engine runs against a production API layer and an
//! in-memory test store alike.
//!
//! # Quick Start
//!
//! ```rust
//! use vitrine_core::{
//!     record::Record,
//!     schema::{Field, FieldType, Schema, Table},
//!     store::MemoryStore,
//!     FormatterEngineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new(vec![Table {
//!     name: "Agent".to_string(),
//!     label: "Agent".to_string(),
//!     format: None,
//!     aggregator: None,
//!     fields: vec![Field {
//!         name: "lastName".to_string(),
//!         field_type: FieldType::Text,
//!         is_required: true,
//!         is_hidden: false,
//!         is_read_only: false,
//!         is_virtual: false,
//!         formatter: None,
//!         pick_list: None,
//!     }],
//!     relationships: vec![],
//! }]);
//!
//! let mut store = MemoryStore::new();
//! store.insert(Record::new("Agent", Some(1)).with_value("lastName", "Linnaeus"));
//!
//! let engine = FormatterEngineBuilder::new()
//!     .with_schema(schema)
//!     .with_store(store)
//!     .build()?;
//!
//! // No definitions configured: the synthesized fallback picks the most
//! // interesting text fields.
//! let record = Record::new("Agent", Some(1));
//! let text = engine.format(&record, None, false).await?;
//! assert_eq!(text.as_deref(), Some("Linnaeus"));
//! # Ok(())
//! # }
//! ```

pub mod definitions;
pub mod engine;
pub mod error;
pub mod leaf;
pub mod pattern;
pub mod record;
pub mod schema;
pub mod store;

// Re-export commonly used types
pub use definitions::{
    Aggregator, AggregatorRef, Definitions, DefinitionsSpec, FieldEntry, FieldGroup, Formatter,
    FormatterRef,
};
pub use engine::{CycleGuard, FormatterEngine, FormatterEngineBuilder, RESTRICTED};
pub use error::{FormatError, Result};
pub use pattern::{PatternField, PatternFormatter};
pub use record::Record;
pub use schema::{Field, FieldType, Relationship, RelationshipKind, Schema, Table};
pub use store::{AllowAll, MemoryStore, PermissionGate, PickList, PickListItem, RecordStore};
