use vitrine_core::{
    schema::{Field, FieldType, Relationship, RelationshipKind, Schema, Table},
    store::MemoryStore,
    PermissionGate,
};

/// Builds a text field with everything else defaulted.
pub fn text_field(name: &str) -> Field {
    Field {
        name: name.to_string(),
        field_type: FieldType::Text,
        is_required: false,
        is_hidden: false,
        is_read_only: false,
        is_virtual: false,
        formatter: None,
        pick_list: None,
    }
}

pub fn to_one(name: &str, table: &str) -> Relationship {
    Relationship {
        name: name.to_string(),
        related_table: table.to_string(),
        kind: RelationshipKind::ToOne,
        is_dependent: false,
    }
}

pub fn to_many(name: &str, table: &str) -> Relationship {
    Relationship {
        name: name.to_string(),
        related_table: table.to_string(),
        kind: RelationshipKind::ToMany,
        is_dependent: true,
    }
}

/// A small natural-history schema: collection objects with determinations
/// and a cataloging agent, agents possibly pointing at themselves through
/// `organization`.
pub fn test_schema() -> Schema {
    let mut catalog_number = text_field("catalogNumber");
    catalog_number.formatter = Some("CatalogNumberNumeric".to_string());

    Schema::new(vec![
        Table {
            name: "CollectionObject".to_string(),
            label: "Collection Object".to_string(),
            format: None,
            aggregator: None,
            fields: vec![catalog_number, text_field("remarks")],
            relationships: vec![
                to_many("determinations", "Determination"),
                to_one("cataloger", "Agent"),
            ],
        },
        Table {
            name: "Determination".to_string(),
            label: "Determination".to_string(),
            format: None,
            aggregator: None,
            fields: vec![text_field("taxonName"), {
                let mut f = text_field("orderNumber");
                f.field_type = FieldType::Integer;
                f
            }],
            relationships: vec![to_one("collectionObject", "CollectionObject")],
        },
        Table {
            name: "Agent".to_string(),
            label: "Agent".to_string(),
            format: None,
            aggregator: None,
            fields: vec![text_field("lastName"), text_field("firstName")],
            relationships: vec![to_one("organization", "Agent")],
        },
    ])
}

pub fn test_store() -> MemoryStore {
    MemoryStore::from_json(
        r#"{
            "records": {
                "CollectionObject": [
                    {"id": 1, "catalogNumber": "123", "determinations": [10, 11, 12], "cataloger": 20}
                ],
                "Determination": [
                    {"id": 10, "taxonName": "Felis catus", "orderNumber": 2, "collectionObject": 1},
                    {"id": 11, "taxonName": "Felis silvestris", "orderNumber": 1, "collectionObject": 1},
                    {"id": 12, "taxonName": "Felis sp.", "collectionObject": 1}
                ],
                "Agent": [
                    {"id": 20, "lastName": "Linnaeus", "firstName": "Carl", "organization": 21},
                    {"id": 21, "lastName": "Uppsala", "organization": 21}
                ]
            }
        }"#,
    )
    .expect("test dataset parses")
}

/// Denies both table and path reads for one table.
pub struct DenyTable(pub String);

impl PermissionGate for DenyTable {
    fn can_read_table(&self, table: &str) -> bool {
        !table.eq_ignore_ascii_case(&self.0)
    }

    fn can_read_path(&self, table: &str, _path: &str) -> bool {
        !table.eq_ignore_ascii_case(&self.0)
    }
}
