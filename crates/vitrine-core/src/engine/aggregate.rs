//! Aggregation of related-record collections into one joined string.

use std::cmp::Ordering;

use futures::future::{join_all, BoxFuture, FutureExt};
use log::warn;

use super::{CycleGuard, FormatterEngine};
use crate::{
    definitions::{AggregatorRef, FormatterRef},
    error::{FormatError, Result},
    record::Record,
};

impl FormatterEngine {
    /// Aggregates a collection of records into one joined display string.
    ///
    /// Members are truncated to the aggregator's limit, formatted
    /// concurrently, sorted ascending by the aggregator's sort field (unset
    /// values last, original order among equals), joined with the separator,
    /// and followed by the suffix. An empty collection aggregates to an
    /// empty string.
    ///
    /// # Errors
    ///
    /// Only a failed fetch inside a member's formatting propagates.
    pub async fn aggregate(
        &self,
        members: &[Record],
        aggregator: Option<AggregatorRef>,
    ) -> Result<String> {
        self.aggregate_inner(members.to_vec(), aggregator, CycleGuard::default())
            .await
    }

    pub(crate) fn aggregate_inner(
        &self,
        members: Vec<Record>,
        aggregator: Option<AggregatorRef>,
        guard: CycleGuard,
    ) -> BoxFuture<'_, Result<String>> {
        async move {
            if members.is_empty() {
                return Ok(String::new());
            }
            let Some(table) = self.schema.table(&members[0].table) else {
                warn!("members belong to unknown table '{}'", members[0].table);
                return Ok(String::new());
            };

            let definition = self.definitions.resolve_aggregator(aggregator.as_ref(), table);

            let mut members = members;
            if let Some(limit) = definition.effective_limit() {
                members.truncate(limit);
            }

            // Fan out: every member's text and sort key are computed
            // together and joined once all settle.
            let tasks = members.into_iter().map(|member| {
                let guard = guard.clone();
                let formatter = definition.formatter.clone().map(FormatterRef::Named);
                let sort_field = definition.sort_field.clone();
                async move {
                    let text = self
                        .format_inner(member.clone(), formatter, false, guard)
                        .await?;
                    let sort_key = match sort_field {
                        Some(path) => self.raw_path_value(&member, table, &path).await,
                        None => None,
                    };
                    Ok::<_, FormatError>((text, sort_key))
                }
            });

            let mut entries: Vec<(String, Option<String>)> = Vec::new();
            for outcome in join_all(tasks).await {
                let (text, sort_key) = outcome?;
                // Members that formatted to nothing are dropped entirely
                if let Some(text) = text {
                    entries.push((text, sort_key));
                }
            }

            // Vec::sort_by is stable, preserving original order among ties
            entries.sort_by(|a, b| compare_keys(a.1.as_deref(), b.1.as_deref()));

            let mut joined = entries
                .iter()
                .map(|(text, _)| text.as_str())
                .collect::<Vec<_>>()
                .join(&definition.separator);
            joined.push_str(&definition.suffix);
            Ok(joined)
        }
        .boxed()
    }
}

/// Ascending sort-key comparison: unset keys sort last, numeric keys compare
/// numerically, everything else lexically.
fn compare_keys(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(x: &str, y: &str) -> Ordering {
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => x.cmp(y),
    }
}
