//! Tests for ticket type definitions, structural checks and format conversion.
mod common;
use common::*;
use serde_json::json;
use ticketry::error::{ConversionError, SchemaViolation};
use ticketry::prelude::*;
use ticketry::schema::structure;

fn violations_of(fields: Vec<FieldDefinition>) -> Vec<SchemaViolation> {
    structure::violations(&TicketType::new("t", "T", fields))
}

#[test]
fn test_fixture_types_are_structurally_sound() {
    for ticket_type in ticketry::seed::ticket_types() {
        assert_eq!(structure::check(&ticket_type), Ok(()), "{}", ticket_type.id);
    }
    assert!(structure::check(&create_location_type()).is_ok());
}

#[test]
fn test_duplicate_field_ids_are_rejected() {
    let violations = violations_of(vec![
        FieldDefinition::text("name", "Name"),
        FieldDefinition::textarea("name", "Name again"),
    ]);
    assert_eq!(
        violations,
        vec![SchemaViolation::DuplicateFieldId {
            field_id: "name".into()
        }]
    );
}

#[test]
fn test_forward_and_missing_dependencies_are_rejected() {
    let violations = violations_of(vec![
        FieldDefinition::dynamic_dropdown("child", "Child", "parent", [("a", ["x"])]),
        FieldDefinition::dropdown("parent", "Parent", ["a"]),
        FieldDefinition::dynamic_dropdown("orphan", "Orphan", "nowhere", [("a", ["x"])]),
    ]);
    assert_eq!(
        violations,
        vec![
            SchemaViolation::ForwardDependency {
                field_id: "child".into(),
                depends_on: "parent".into()
            },
            SchemaViolation::MissingDependency {
                field_id: "orphan".into(),
                depends_on: "nowhere".into()
            },
        ]
    );
}

#[test]
fn test_dependency_on_non_option_field_is_rejected() {
    let violations = violations_of(vec![
        FieldDefinition::text("free", "Free text"),
        FieldDefinition::dynamic_dropdown("child", "Child", "free", [("a", ["x"])]),
    ]);
    assert_eq!(
        violations,
        vec![SchemaViolation::NonOptionParent {
            field_id: "child".into(),
            depends_on: "free".into(),
            parent_type: FieldType::Text,
        }]
    );
}

#[test]
fn test_radio_and_checkbox_cannot_drive_dependents() {
    let violations = violations_of(vec![
        FieldDefinition::radio("pick", "Pick", ["a", "b"]),
        FieldDefinition::dynamic_dropdown("child", "Child", "pick", [("a", ["x"])]),
    ]);
    assert!(matches!(
        violations.as_slice(),
        [SchemaViolation::NonOptionParent { parent_type: FieldType::Radio, .. }]
    ));
}

#[test]
fn test_cycles_and_self_references_are_rejected() {
    let violations = violations_of(vec![
        FieldDefinition::dynamic_dropdown("a", "A", "b", [("x", ["y"])]),
        FieldDefinition::dynamic_dropdown("b", "B", "a", [("y", ["x"])]),
        FieldDefinition::dynamic_dropdown("c", "C", "c", [("x", ["y"])]),
    ]);

    assert!(violations.contains(&SchemaViolation::DependencyCycle {
        path: vec!["a".into(), "b".into(), "a".into()]
    }));
    assert!(violations.contains(&SchemaViolation::SelfDependency {
        field_id: "c".into()
    }));
    // The cycle is reported once, not once per member.
    let cycles = violations
        .iter()
        .filter(|v| matches!(v, SchemaViolation::DependencyCycle { .. }))
        .count();
    assert_eq!(cycles, 1);
}

#[test]
fn test_variant_attributes_are_checked() {
    let violations = violations_of(vec![
        FieldDefinition::rating("stars", "Stars", 0),
        FieldDefinition::number("score", "Score", Some(10.0), Some(1.0)),
        FieldDefinition::dropdown("empty", "Empty", Vec::<String>::new()),
        FieldDefinition::checkbox("tags", "Tags", ["a", "b", "a"]),
    ]);
    assert_eq!(violations.len(), 4);
    assert!(violations.contains(&SchemaViolation::InvalidRatingMax {
        field_id: "stars".into()
    }));
    assert!(violations.contains(&SchemaViolation::DuplicateOption {
        field_id: "tags".into(),
        option: "a".into()
    }));
}

#[test]
fn test_all_violations_are_reported_together() {
    let ticket_type = TicketType::new(
        "",
        " ",
        vec![
            FieldDefinition::text("x", "X"),
            FieldDefinition::text("x", "X"),
            FieldDefinition::dynamic_dropdown("y", "Y", "x", [("a", ["b"])]),
        ],
    );
    let err = structure::check(&ticket_type).unwrap_err();
    assert_eq!(err.violations.len(), 4);
    assert_eq!(err.violations[0], SchemaViolation::EmptyId);
    assert_eq!(err.violations[1], SchemaViolation::EmptyName);
}

#[test]
fn test_ticket_type_ids_must_be_slugs() {
    for id in ["Quality Monitoring", "a/b", "audit_v2", "Review"] {
        let violations = structure::violations(&TicketType::new(id, "Audit", vec![]));
        assert_eq!(violations, vec![SchemaViolation::InvalidId { id: id.into() }]);
    }
    assert!(structure::check(&TicketType::new("audit-2", "Audit", vec![])).is_ok());

    let store = TicketStore::new();
    assert!(matches!(
        store.create_ticket_type(TicketType::new("Audit Log", "Audit", vec![])),
        Err(RegistryError::InvalidSchema(_))
    ));
    assert!(store.list_ticket_types().is_empty());
}

#[test]
fn test_field_serialization_uses_wire_shape() {
    let field = FieldDefinition::dynamic_dropdown(
        "errorSubType",
        "Error Sub-Type",
        "errorCategory",
        [("Technical Errors", ["Tool Misuse"])],
    )
    .required();

    let value = serde_json::to_value(&field).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "errorSubType",
            "label": "Error Sub-Type",
            "required": true,
            "type": "dynamic_dropdown",
            "dependsOn": "errorCategory",
            "optionsMap": { "Technical Errors": ["Tool Misuse"] }
        })
    );

    let back: FieldDefinition = serde_json::from_value(value).unwrap();
    assert_eq!(back, field);
}

#[test]
fn test_canonical_ticket_type_parses_with_defaults() {
    let ticket_type: TicketType = serde_json::from_value(json!({
        "id": "survey",
        "name": "Survey",
        "fields": [
            { "id": "score", "label": "Score", "type": "rating", "max": 10 },
            { "id": "comment", "label": "Comment", "type": "textarea" }
        ]
    }))
    .unwrap();

    assert_eq!(ticket_type.fields.len(), 2);
    assert!(!ticket_type.fields[0].required);
    assert_eq!(ticket_type.fields[0].kind, FieldKind::Rating { max: 10 });
}

#[test]
fn test_unknown_field_type_fails_to_parse() {
    let result: std::result::Result<FieldDefinition, _> = serde_json::from_value(json!({
        "id": "x", "label": "X", "type": "slider"
    }));
    assert!(result.is_err());
    assert_eq!(
        "slider".parse::<FieldType>(),
        Err(ConversionError::UnknownFieldType {
            field_id: String::new(),
            type_name: "slider".into()
        })
    );
}

#[test]
fn test_builder_form_conversion() {
    let form: BuilderForm = serde_json::from_value(json!({
        "name": "Compliance Audit",
        "fields": [
            { "id": "area", "label": "Area", "type": "dropdown", "required": true,
              "options": "Privacy, Security ,, Billing" },
            { "id": "finding", "label": "Finding", "type": "dynamic_dropdown",
              "dependsOn": "area",
              "optionsMap": "{\"Privacy\": [\"Consent missing\"], \"Security\": [\"Weak password\"]}" },
            { "id": "severity", "label": "Severity", "type": "rating" }
        ]
    }))
    .unwrap();

    let ticket_type = form.into_ticket_type().unwrap();
    assert_eq!(ticket_type.id, "compliance-audit");
    assert_eq!(
        ticket_type.fields[0].kind,
        FieldKind::Dropdown {
            options: vec!["Privacy".into(), "Security".into(), "Billing".into()]
        }
    );
    assert_eq!(ticket_type.fields[1].depends_on(), Some("area"));
    assert_eq!(
        ticket_type.fields[1].possible_values(),
        vec!["Consent missing".to_string(), "Weak password".to_string()]
    );
    assert_eq!(ticket_type.fields[2].kind, FieldKind::Rating { max: 5 });
    assert!(structure::check(&ticket_type).is_ok());
}

#[test]
fn test_builder_form_rejects_bad_options_map_text() {
    let form: BuilderForm = serde_json::from_value(json!({
        "name": "Broken",
        "fields": [
            { "id": "a", "label": "A", "type": "dropdown", "options": ["x"] },
            { "id": "b", "label": "B", "type": "dynamic_dropdown", "dependsOn": "a",
              "optionsMap": "{not json" }
        ]
    }))
    .unwrap();

    assert!(matches!(
        form.into_ticket_type(),
        Err(ConversionError::InvalidOptionsMap { field_id, .. }) if field_id == "b"
    ));
}

#[test]
fn test_dependency_helpers_follow_the_chain() {
    let location = create_location_type();
    let chain: Vec<&str> = location
        .dependency_chain("city")
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(chain, ["region", "country"]);

    let dependents: Vec<&str> = location
        .transitive_dependents("region")
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(dependents, ["country", "city"]);
    assert!(location.transitive_dependents("notes").is_empty());
}
