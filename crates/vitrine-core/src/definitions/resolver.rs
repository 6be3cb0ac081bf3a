//! Definition resolution: requested name or object, table default, or a
//! synthesized fallback. Pure metadata work, no I/O.

use super::{
    Aggregator, AggregatorRef, Definitions, FieldEntry, FieldGroup, Formatter, FormatterRef,
};
use crate::schema::{Field, Table};

impl Definitions {
    /// Resolves a concrete formatter definition for a table.
    ///
    /// Order: an inline definition is used as-is; a requested name is looked
    /// up; otherwise the table's assigned default name, the table's
    /// `isDefault` definition, the first definition for the table, and
    /// finally a synthesized fallback.
    pub fn resolve_formatter(&self, requested: Option<&FormatterRef>, table: &Table) -> Formatter {
        match requested {
            Some(FormatterRef::Inline(definition)) => definition.clone(),
            Some(FormatterRef::Named(name)) => self
                .formatter_by_name(name)
                .cloned()
                .unwrap_or_else(|| self.default_formatter_for(table)),
            None => table
                .format
                .as_deref()
                .and_then(|name| self.formatter_by_name(name))
                .cloned()
                .unwrap_or_else(|| self.default_formatter_for(table)),
        }
    }

    /// Resolves a concrete aggregator definition for a table, mirroring
    /// [`Self::resolve_formatter`].
    pub fn resolve_aggregator(
        &self,
        requested: Option<&AggregatorRef>,
        table: &Table,
    ) -> Aggregator {
        match requested {
            Some(AggregatorRef::Inline(definition)) => definition.clone(),
            Some(AggregatorRef::Named(name)) => self
                .aggregator_by_name(name)
                .cloned()
                .unwrap_or_else(|| self.default_aggregator_for(table)),
            None => table
                .aggregator
                .as_deref()
                .and_then(|name| self.aggregator_by_name(name))
                .cloned()
                .unwrap_or_else(|| self.default_aggregator_for(table)),
        }
    }

    fn default_formatter_for(&self, table: &Table) -> Formatter {
        self.formatters()
            .iter()
            .find(|f| f.table.eq_ignore_ascii_case(&table.name) && f.is_default)
            .or_else(|| {
                self.formatters()
                    .iter()
                    .find(|f| f.table.eq_ignore_ascii_case(&table.name))
            })
            .cloned()
            .unwrap_or_else(|| synthesize_formatter(table))
    }

    fn default_aggregator_for(&self, table: &Table) -> Aggregator {
        self.aggregators()
            .iter()
            .find(|a| a.table.eq_ignore_ascii_case(&table.name) && a.is_default)
            .or_else(|| {
                self.aggregators()
                    .iter()
                    .find(|a| a.table.eq_ignore_ascii_case(&table.name))
            })
            .cloned()
            .unwrap_or_else(|| synthesize_aggregator(table))
    }
}

/// Synthesizes a formatter listing the table's two most interesting literal
/// text fields. A table with zero qualifying fields yields an empty field
/// list, which formats to an empty string rather than failing.
pub fn synthesize_formatter(table: &Table) -> Formatter {
    let mut candidates: Vec<&Field> = table.literal_text_fields().collect();
    candidates.sort_by_key(|field| std::cmp::Reverse(interest(field)));

    let fields = candidates
        .into_iter()
        .take(2)
        .enumerate()
        .map(|(index, field)| FieldEntry {
            path: field.name.clone(),
            separator: if index == 0 { String::new() } else { ", ".to_string() },
            formatter: None,
            aggregator: None,
            field_formatter: None,
        })
        .collect();

    Formatter {
        name: table.name.clone(),
        title: table.label.clone(),
        table: table.name.clone(),
        is_default: false,
        condition_field: None,
        field_groups: vec![FieldGroup {
            match_value: None,
            fields,
        }],
    }
}

/// Synthesizes a limit-4, `"; "`-separated aggregator over the table's
/// default formatter.
pub fn synthesize_aggregator(table: &Table) -> Aggregator {
    Aggregator {
        name: table.name.clone(),
        title: table.label.clone(),
        table: table.name.clone(),
        is_default: false,
        separator: "; ".to_string(),
        suffix: String::new(),
        limit: Some(4),
        formatter: None,
        sort_field: None,
    }
}

/// Interest ranking for fallback synthesis. Each criterion breaks ties in
/// order; the sort is stable, so otherwise-equal fields keep declaration
/// order.
fn interest(field: &Field) -> (bool, bool, bool, bool) {
    (
        field.name.to_ascii_lowercase().contains("name"),
        field.is_required,
        field.formatter.is_some(),
        !(field.is_virtual || field.is_hidden || field.is_read_only),
    )
}
