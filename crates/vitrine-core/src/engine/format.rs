//! Recursive resource formatting.

use futures::future::{BoxFuture, FutureExt};
use log::warn;

use super::{naive_label, CycleGuard, FormatterEngine, RESTRICTED};
use crate::{
    definitions::{AggregatorRef, FieldEntry, FormatterRef},
    error::Result,
    leaf,
    record::Record,
    schema::Table,
};

impl FormatterEngine {
    /// Formats one record into its display string.
    ///
    /// `formatter` requests a definition by name or inline object; absent, the
    /// table's configured default applies. With `try_best` set, a record that
    /// produces no content yields the naive fallback string instead of an
    /// empty one, and a permission denial yields the naive placeholder
    /// instead of the fixed denial string.
    ///
    /// Returns `None` for an absent or deleted record.
    ///
    /// # Errors
    ///
    /// Only a failed record or collection fetch propagates; every other
    /// problem degrades to a placeholder or an empty fragment.
    pub async fn format(
        &self,
        record: &Record,
        formatter: Option<FormatterRef>,
        try_best: bool,
    ) -> Result<Option<String>> {
        self.format_inner(record.clone(), formatter, try_best, CycleGuard::default())
            .await
    }

    pub(crate) fn format_inner(
        &self,
        record: Record,
        formatter: Option<FormatterRef>,
        try_best: bool,
        guard: CycleGuard,
    ) -> BoxFuture<'_, Result<Option<String>>> {
        async move {
            let Some(table) = self.schema.table(&record.table) else {
                warn!("record belongs to unknown table '{}'", record.table);
                return Ok(None);
            };

            // Fully fetch first when the caller may; otherwise proceed with
            // resident fields only.
            let mut record = record;
            if let Some(id) = record.id {
                if self.permissions.can_read_table(&table.name) {
                    match self.store.fetch(&table.name, id).await? {
                        Some(full) => record = full,
                        None => return Ok(None),
                    }
                }
            }

            let definition = self.definitions.resolve_formatter(formatter.as_ref(), table);

            let condition_value = match &definition.condition_field {
                Some(path) => self.raw_path_value(&record, table, path).await,
                None => None,
            };

            let mut result = String::new();
            if let Some(group) = definition.active_group(condition_value.as_deref()) {
                for (index, entry) in group.fields.iter().enumerate() {
                    let contribution = self
                        .format_field(entry, &record, table, &guard, try_best)
                        .await?;
                    // An empty contribution is dropped along with its own
                    // leading separator.
                    if contribution.is_empty() {
                        continue;
                    }
                    if !(result.is_empty() && index == 0) {
                        result.push_str(&entry.separator);
                    }
                    result.push_str(&contribution);
                }
            }

            if result.is_empty() && try_best {
                return Ok(Some(naive_label(&table.label, &record)));
            }
            Ok(Some(result))
        }
        .boxed()
    }

    /// Computes one field entry's contribution to a record's display string.
    async fn format_field(
        &self,
        entry: &FieldEntry,
        parent: &Record,
        table: &Table,
        guard: &CycleGuard,
        try_best: bool,
    ) -> Result<String> {
        if !self.permissions.can_read_path(&table.name, &entry.path) {
            return Ok(if try_best {
                naive_label(&table.label, parent)
            } else {
                RESTRICTED.to_string()
            });
        }

        let Some((holder, holder_table, leaf_name)) =
            self.walk_to_leaf(parent, table, &entry.path).await?
        else {
            return Ok(String::new());
        };

        if let Some(relationship) = holder_table.relationship(&leaf_name) {
            if let Some(id) = holder.id {
                if guard.contains(&holder.table, id) {
                    return Ok(String::new());
                }
            }
            let child_guard = guard.child(&parent.table, parent.id);
            if relationship.is_to_many() {
                let members = self.store.related_many(&holder, relationship).await?;
                let requested = entry.aggregator.clone().map(AggregatorRef::Named);
                self.aggregate_inner(members, requested, child_guard).await
            } else {
                match self.store.related_one(&holder, relationship).await? {
                    Some(related) => {
                        let requested = entry.formatter.clone().map(FormatterRef::Named);
                        Ok(self
                            .format_inner(related, requested, false, child_guard)
                            .await?
                            .unwrap_or_default())
                    }
                    None => Ok(String::new()),
                }
            }
        } else if let Some(field) = holder_table.field(&leaf_name) {
            Ok(leaf::field_format(
                field,
                holder.raw(&leaf_name),
                &self.definitions,
                self.store.as_ref(),
                None,
                entry.field_formatter.as_deref(),
            )
            .await)
        } else {
            warn!(
                "path '{}' does not resolve: '{leaf_name}' is not a field of '{}'",
                entry.path, holder_table.name
            );
            Ok(String::new())
        }
    }

    /// Walks a dotted path, fetching through every relationship but the
    /// last, to the record and table holding the final segment. `None` when
    /// a link along the way is unset or the path does not resolve.
    async fn walk_to_leaf<'a>(
        &'a self,
        parent: &Record,
        table: &'a Table,
        path: &str,
    ) -> Result<Option<(Record, &'a Table, String)>> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut record = parent.clone();
        let mut current = table;
        for segment in &segments[..segments.len() - 1] {
            let Some(relationship) = current.relationship(segment) else {
                warn!(
                    "path '{path}' does not resolve: '{segment}' is not a relationship of '{}'",
                    current.name
                );
                return Ok(None);
            };
            if relationship.is_to_many() {
                warn!("path '{path}' traverses to-many relationship '{segment}' before its end");
                return Ok(None);
            }
            let Some(next) = self.store.related_one(&record, relationship).await? else {
                return Ok(None);
            };
            let Some(next_table) = self.schema.table(&relationship.related_table) else {
                warn!(
                    "relationship '{segment}' points at unknown table '{}'",
                    relationship.related_table
                );
                return Ok(None);
            };
            record = next;
            current = next_table;
        }
        let leaf_name = segments.last().map(ToString::to_string).unwrap_or_default();
        Ok(Some((record, current, leaf_name)))
    }

    /// Raw stringified value at the end of a path, bypassing display
    /// formatting. Used for condition-field evaluation and sort keys; any
    /// failure along the way reads as "no value".
    pub(crate) async fn raw_path_value(
        &self,
        record: &Record,
        table: &Table,
        path: &str,
    ) -> Option<String> {
        let (holder, holder_table, leaf_name) =
            self.walk_to_leaf(record, table, path).await.ok().flatten()?;
        if holder_table.field(&leaf_name).is_some() {
            holder.raw_string(&leaf_name)
        } else {
            None
        }
    }
}
