//! Builder for creating and configuring FormatterEngine instances.

use std::sync::Arc;

use super::FormatterEngine;
use crate::{
    definitions::{Definitions, DefinitionsSpec},
    error::{FormatError, Result},
    schema::Schema,
    store::{AllowAll, PermissionGate, RecordStore},
};

/// Builder for creating and configuring [`FormatterEngine`] instances.
///
/// A schema and a record store are required; definitions default to an empty
/// set (every table then formats through a synthesized fallback) and
/// permissions default to [`AllowAll`]. All pattern formatters compile and
/// all definitions validate during [`build`](Self::build), so configuration
/// problems surface here and never during per-record formatting.
#[derive(Default)]
pub struct FormatterEngineBuilder {
    schema: Option<Schema>,
    definitions: Option<DefinitionsSpec>,
    store: Option<Arc<dyn RecordStore>>,
    permissions: Option<Arc<dyn PermissionGate>>,
}

impl FormatterEngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema registry.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the definition set to compile.
    pub fn with_definitions(mut self, definitions: DefinitionsSpec) -> Self {
        self.definitions = Some(definitions);
        self
    }

    /// Sets the record store backing relationship and pick-list fetches.
    pub fn with_store(mut self, store: impl RecordStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Sets a shared record store.
    pub fn with_shared_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the permission gate. Defaults to [`AllowAll`].
    pub fn with_permissions(mut self, permissions: impl PermissionGate + 'static) -> Self {
        self.permissions = Some(Arc::new(permissions));
        self
    }

    /// Builds the configured engine.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Configuration`] if the schema or store is
    /// missing, or if any definition fails to compile or validate.
    pub fn build(self) -> Result<FormatterEngine> {
        let schema = self
            .schema
            .ok_or_else(|| FormatError::configuration("a schema is required"))?;
        let store = self
            .store
            .ok_or_else(|| FormatError::configuration("a record store is required"))?;
        let definitions =
            Definitions::compile(self.definitions.unwrap_or_default(), &schema)?;

        Ok(FormatterEngine {
            schema: Arc::new(schema),
            definitions: Arc::new(definitions),
            store,
            permissions: self.permissions.unwrap_or_else(|| Arc::new(AllowAll)),
        })
    }
}
