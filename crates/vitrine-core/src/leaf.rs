//! Leaf field value formatting.
//!
//! Converts one literal field's raw value to display text by folding over an
//! ordered list of strategies: the field's pattern formatter, then its pick
//! list, then a generic parser for the declared type. Each strategy either
//! produces a string or skips to the next; nothing here ever fails, so a
//! value that defeats every strategy comes back unchanged.

use jiff::civil::Date;
use log::warn;
use serde_json::Value;

use crate::{
    definitions::Definitions,
    record::stringify,
    schema::{Field, FieldType},
    store::{PickList, RecordStore},
};

/// Formats a literal field's raw value, resolving the pick list through the
/// store (pick lists may require a fetch).
///
/// `type_override` substitutes the baseline parser for the field's declared
/// type; `formatter_override` substitutes the field's assigned pattern
/// formatter. Always returns a string, possibly empty, never an error.
pub async fn field_format(
    field: &Field,
    raw: Option<&Value>,
    definitions: &Definitions,
    store: &dyn RecordStore,
    type_override: Option<FieldType>,
    formatter_override: Option<&str>,
) -> String {
    let Some(raw_text) = raw.and_then(stringify) else {
        return String::new();
    };

    if let Some(formatted) = try_pattern(field, &raw_text, definitions, formatter_override) {
        return formatted;
    }

    let pick_list = match field.pick_list.as_deref() {
        Some(name) => match store.pick_list(name).await {
            Ok(list) => list,
            Err(e) => {
                warn!("pick list '{name}' could not be fetched: {e}");
                None
            }
        },
        None => None,
    };

    finish(field, &raw_text, pick_list.as_ref(), type_override)
}

/// Synchronous variant of [`field_format`] for an already-loaded pick list.
pub fn sync_field_format(
    field: &Field,
    raw: Option<&Value>,
    definitions: &Definitions,
    pick_list: Option<&PickList>,
    type_override: Option<FieldType>,
    formatter_override: Option<&str>,
) -> String {
    let Some(raw_text) = raw.and_then(stringify) else {
        return String::new();
    };

    if let Some(formatted) = try_pattern(field, &raw_text, definitions, formatter_override) {
        return formatted;
    }

    finish(field, &raw_text, pick_list, type_override)
}

/// Pattern formatter strategy: the override name, else the field's assigned
/// formatter. A mismatch is logged and skipped, not an error.
fn try_pattern(
    field: &Field,
    raw_text: &str,
    definitions: &Definitions,
    formatter_override: Option<&str>,
) -> Option<String> {
    let name = formatter_override.or(field.formatter.as_deref())?;
    let pattern = definitions.pattern(name)?;
    match pattern.format(raw_text) {
        Some(formatted) => Some(formatted),
        None => {
            warn!(
                "value '{raw_text}' of field '{}' does not match pattern formatter '{name}'",
                field.name
            );
            None
        }
    }
}

fn finish(
    field: &Field,
    raw_text: &str,
    pick_list: Option<&PickList>,
    type_override: Option<FieldType>,
) -> String {
    if let Some(title) = pick_list.and_then(|list| list.title_for(raw_text)) {
        return title.to_string();
    }

    let field_type = type_override.unwrap_or(field.field_type);
    match generic_format(field_type, raw_text) {
        Some(formatted) => formatted,
        None => {
            warn!(
                "value '{raw_text}' of field '{}' does not parse as {field_type:?}",
                field.name
            );
            raw_text.to_string()
        }
    }
}

/// Baseline parser and print formatting for a declared field type.
fn generic_format(field_type: FieldType, raw_text: &str) -> Option<String> {
    match field_type {
        FieldType::Text => Some(raw_text.to_string()),
        FieldType::Integer => raw_text.trim().parse::<i64>().ok().map(|n| n.to_string()),
        FieldType::Decimal => raw_text.trim().parse::<f64>().ok().map(|n| n.to_string()),
        // NOTE: this layout can differ from the date layout used elsewhere in
        // a deployment; inherited behavior, kept as-is.
        FieldType::Date => Date::strptime("%Y-%m-%d", raw_text.trim())
            .ok()
            .map(|date| date.strftime("%b %d, %Y").to_string()),
        FieldType::Boolean => match raw_text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some("Yes".to_string()),
            "false" | "0" => Some("No".to_string()),
            _ => None,
        },
    }
}
