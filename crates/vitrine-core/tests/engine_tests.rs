mod common;

use common::{test_schema, test_store, DenyTable};
use vitrine_core::{
    definitions::{
        Aggregator, AggregatorRef, DefinitionsSpec, FieldEntry, FieldGroup, Formatter,
    },
    record::Record,
    FormatterEngineBuilder, FormatterRef, RESTRICTED,
};

fn entry(path: &str, separator: &str) -> FieldEntry {
    FieldEntry {
        path: path.to_string(),
        separator: separator.to_string(),
        formatter: None,
        aggregator: None,
        field_formatter: None,
    }
}

fn formatter(name: &str, table: &str, fields: Vec<FieldEntry>) -> Formatter {
    Formatter {
        name: name.to_string(),
        title: name.to_string(),
        table: table.to_string(),
        is_default: false,
        condition_field: None,
        field_groups: vec![FieldGroup {
            match_value: None,
            fields,
        }],
    }
}

fn default_definitions() -> DefinitionsSpec {
    DefinitionsSpec {
        formatters: vec![
            {
                let mut f = formatter(
                    "AgentName",
                    "Agent",
                    vec![entry("lastName", ""), entry("firstName", ", ")],
                );
                f.is_default = true;
                f
            },
            formatter("Taxon", "Determination", vec![entry("taxonName", "")]),
            {
                let mut f = formatter(
                    "ObjectFull",
                    "CollectionObject",
                    vec![
                        entry("catalogNumber", ""),
                        entry("cataloger.lastName", " by "),
                        {
                            let mut e = entry("determinations", ": ");
                            e.aggregator = Some("Determinations".to_string());
                            e
                        },
                    ],
                );
                f.is_default = true;
                f
            },
        ],
        aggregators: vec![Aggregator {
            name: "Determinations".to_string(),
            title: "Determinations".to_string(),
            table: "Determination".to_string(),
            is_default: true,
            separator: "; ".to_string(),
            suffix: String::new(),
            limit: None,
            formatter: Some("Taxon".to_string()),
            sort_field: Some("orderNumber".to_string()),
        }],
        pattern_formatters: vec![],
    }
}

fn engine_with(definitions: DefinitionsSpec) -> vitrine_core::FormatterEngine {
    FormatterEngineBuilder::new()
        .with_schema(test_schema())
        .with_definitions(definitions)
        .with_store(test_store())
        .build()
        .expect("engine builds")
}

#[tokio::test]
async fn formats_a_record_through_nested_paths_and_aggregates() {
    let engine = engine_with(default_definitions());
    let record = Record::new("CollectionObject", Some(1));

    let text = engine.format(&record, None, false).await.unwrap().unwrap();
    // Catalog number goes through the built-in pattern formatter; the
    // determinations sort by orderNumber with the unset one last.
    assert_eq!(
        text,
        "000000123 by Linnaeus: Felis silvestris; Felis catus; Felis sp."
    );
}

#[tokio::test]
async fn absent_records_format_to_none() {
    let engine = engine_with(default_definitions());
    let record = Record::new("CollectionObject", Some(999));
    assert_eq!(engine.format(&record, None, false).await.unwrap(), None);
}

#[tokio::test]
async fn empty_contributions_drop_their_separators() {
    let engine = engine_with(default_definitions());
    // Agent 21 has no firstName: the ", " separator must not dangle.
    let record = Record::new("Agent", Some(21));
    let text = engine.format(&record, None, false).await.unwrap().unwrap();
    assert_eq!(text, "Uppsala");
}

#[tokio::test]
async fn self_referential_records_terminate() {
    let mut definitions = default_definitions();
    let mut org = entry("organization", " of ");
    org.formatter = Some("AgentFull".to_string());
    definitions.formatters.push(formatter(
        "AgentFull",
        "Agent",
        vec![entry("lastName", ""), org],
    ));

    let engine = engine_with(definitions);
    // Agent 21 is its own organization: the inner branch contributes
    // nothing instead of recursing forever.
    let record = Record::new("Agent", Some(21));
    let text = engine
        .format(&record, Some(FormatterRef::Named("AgentFull".to_string())), false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text, "Uppsala of Uppsala");
}

#[tokio::test]
async fn aggregation_truncates_to_the_limit() {
    let mut definitions = default_definitions();
    definitions.aggregators[0].limit = Some(2);
    definitions.aggregators[0].sort_field = None;
    let engine = engine_with(definitions);

    let members = [
        Record::new("Determination", Some(10)),
        Record::new("Determination", Some(11)),
        Record::new("Determination", Some(12)),
    ];
    // Truncation happens before sorting, on the incoming order.
    let joined = engine
        .aggregate(&members, Some(AggregatorRef::Named("Determinations".to_string())))
        .await
        .unwrap();
    assert_eq!(joined, "Felis catus; Felis silvestris");
}

#[tokio::test]
async fn aggregation_of_nothing_is_empty() {
    let engine = engine_with(default_definitions());
    assert_eq!(engine.aggregate(&[], None).await.unwrap(), "");
}

#[tokio::test]
async fn aggregation_appends_the_suffix() {
    let mut definitions = default_definitions();
    definitions.aggregators[0].suffix = " (det.)".to_string();
    definitions.aggregators[0].limit = Some(1);
    let engine = engine_with(definitions);

    let members = [Record::new("Determination", Some(10))];
    let joined = engine.aggregate(&members, None).await.unwrap();
    assert_eq!(joined, "Felis catus (det.)");
}

#[tokio::test]
async fn condition_fields_select_their_group() {
    let mut definitions = default_definitions();
    definitions.formatters.push(Formatter {
        name: "ByOrder".to_string(),
        title: String::new(),
        table: "Determination".to_string(),
        is_default: false,
        condition_field: Some("orderNumber".to_string()),
        field_groups: vec![
            FieldGroup {
                match_value: None,
                fields: vec![entry("taxonName", "")],
            },
            FieldGroup {
                match_value: Some("1".to_string()),
                fields: vec![entry("taxonName", ""), entry("orderNumber", " #")],
            },
        ],
    });
    let engine = engine_with(definitions);

    let chosen = engine
        .format(
            &Record::new("Determination", Some(11)),
            Some(FormatterRef::Named("ByOrder".to_string())),
            false,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chosen, "Felis silvestris #1");

    // Unmatched condition values fall back to the first group
    let fallback = engine
        .format(
            &Record::new("Determination", Some(10)),
            Some(FormatterRef::Named("ByOrder".to_string())),
            false,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fallback, "Felis catus");
}

#[tokio::test]
async fn denied_paths_become_placeholders_or_the_denial_string() {
    let definitions = DefinitionsSpec {
        formatters: vec![formatter("AgentName", "Agent", vec![entry("lastName", "")])],
        aggregators: vec![],
        pattern_formatters: vec![],
    };
    let engine = FormatterEngineBuilder::new()
        .with_schema(test_schema())
        .with_definitions(definitions)
        .with_store(test_store())
        .with_permissions(DenyTable("Agent".to_string()))
        .build()
        .unwrap();

    let record = Record::new("Agent", Some(20));
    let best = engine
        .format(&record, Some(FormatterRef::Named("AgentName".to_string())), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(best, "Agent #20");

    let strict = engine
        .format(&record, Some(FormatterRef::Named("AgentName".to_string())), false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(strict, RESTRICTED);
}

#[tokio::test]
async fn empty_output_with_try_best_yields_the_naive_fallback() {
    // Agent 22 exists but has no name fields populated.
    let mut store = test_store();
    store.insert(Record::new("Agent", Some(22)));
    let engine = FormatterEngineBuilder::new()
        .with_schema(test_schema())
        .with_definitions(default_definitions())
        .with_store(store)
        .build()
        .unwrap();

    let record = Record::new("Agent", Some(22));
    assert_eq!(
        engine.format(&record, None, true).await.unwrap().unwrap(),
        "Agent #22"
    );
    assert_eq!(
        engine.format(&record, None, false).await.unwrap().unwrap(),
        ""
    );
}

#[tokio::test]
async fn unsaved_records_use_their_resident_fields() {
    let engine = engine_with(default_definitions());
    let record = Record::new("Agent", None).with_value("lastName", "Draft");
    assert_eq!(
        engine.format(&record, None, false).await.unwrap().unwrap(),
        "Draft"
    );
    // And the new-record naive fallback when nothing is resident
    let blank = Record::new("Agent", None);
    assert_eq!(
        engine.format(&blank, None, true).await.unwrap().unwrap(),
        "new Agent"
    );
}

#[tokio::test]
async fn members_that_format_to_nothing_are_dropped() {
    let engine = engine_with(default_definitions());
    let members = [
        Record::new("Determination", Some(10)),
        // Not in the store: formats to None and is dropped
        Record::new("Determination", Some(404)),
    ];
    let joined = engine.aggregate(&members, None).await.unwrap();
    assert_eq!(joined, "Felis catus");
}
