//! Unit tests for core ticketry types.
mod common;
use serde_json::json;
use ticketry::error::{FieldError, SchemaError, SchemaViolation};
use ticketry::prelude::*;
use ticketry::resolution::is_empty_value;

#[test]
fn test_field_type_round_trips_through_strings() {
    for field_type in FieldType::ALL {
        assert_eq!(field_type.as_str().parse::<FieldType>(), Ok(field_type));
        assert_eq!(format!("{}", field_type), field_type.as_str());
    }
    assert!(FieldType::Dropdown.can_drive_dependents());
    assert!(FieldType::DynamicDropdown.can_drive_dependents());
    assert!(!FieldType::Checkbox.can_drive_dependents());
}

#[test]
fn test_status_wire_names() {
    assert_eq!(serde_json::to_value(TicketStatus::InProgress).unwrap(), json!("In Progress"));
    assert_eq!(
        serde_json::from_value::<TicketStatus>(json!("Closed")).unwrap(),
        TicketStatus::Closed
    );
    assert_eq!(TicketStatus::default(), TicketStatus::New);
    assert_eq!(format!("{}", TicketStatus::InProgress), "In Progress");
}

#[test]
fn test_empty_values() {
    assert!(is_empty_value(&json!(null)));
    assert!(is_empty_value(&json!("")));
    assert!(is_empty_value(&json!([])));
    assert!(!is_empty_value(&json!(0)));
    assert!(!is_empty_value(&json!(false)));
    assert!(!is_empty_value(&json!(" ")));
}

#[test]
fn test_slug_ids() {
    assert_eq!(TicketType::slug_for("Escalation Review"), "escalation-review");
    let tt = TicketType::from_name("Field Visit", vec![]);
    assert_eq!(tt.id, "field-visit");
    assert_eq!(tt.name, "Field Visit");
}

#[test]
fn test_error_messages() {
    let err = RegistryError::InUse {
        id: "quality-monitoring".into(),
        count: 5,
    };
    assert_eq!(
        err.to_string(),
        "Cannot delete ticket type 'quality-monitoring': it is used by 5 ticket(s)"
    );

    let schema = SchemaError {
        ticket_type_id: "t".into(),
        violations: vec![
            SchemaViolation::EmptyName,
            SchemaViolation::DependencyCycle {
                path: vec!["a".into(), "b".into(), "a".into()],
            },
        ],
    };
    assert_eq!(
        schema.to_string(),
        "Ticket type 't' is invalid: Ticket type name must not be empty; \
         Dependency cycle between fields: a -> b -> a"
    );
    assert_eq!(
        RegistryError::from(schema.clone()).to_string(),
        schema.to_string()
    );
}

#[test]
fn test_validation_error_helpers() {
    let errors = ValidationErrors(vec![
        FieldError::new("a", FieldErrorReason::Required),
        FieldError::new("b", FieldErrorReason::UnknownField),
    ]);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.field_ids(), ["a", "b"]);
    assert_eq!(errors.for_field("b").count(), 1);
    assert_eq!(
        errors.to_string(),
        "a: This field is required; b: The ticket type does not declare this field"
    );
    assert_eq!(
        TicketError::Invalid(errors).to_string(),
        "Ticket data is invalid: a: This field is required; \
         b: The ticket type does not declare this field"
    );
}

#[test]
fn test_ticket_accessors() {
    let ticket = Ticket {
        id: "TICKET-1".into(),
        ticket_type_id: "t".into(),
        created_at: chrono::Utc::now(),
        status: TicketStatus::New,
        form_data: common_form(),
    };
    assert_eq!(ticket.text("name"), Some("Ada"));
    assert_eq!(ticket.text("blank"), None);
    assert_eq!(ticket.value("count"), Some(&json!(3)));
    assert_eq!(ticket.text("count"), None);
}

#[test]
fn test_patch_constructors() {
    assert!(TicketPatch::default().is_empty());
    let patch = TicketPatch::retype("t2", FormData::new());
    assert_eq!(patch.ticket_type_id.as_deref(), Some("t2"));
    assert!(!patch.is_empty());

    let parsed: TicketPatch = serde_json::from_value(json!({ "ticketTypeId": "t3" })).unwrap();
    assert_eq!(parsed.ticket_type_id.as_deref(), Some("t3"));
    assert!(parsed.form_data.is_none());
}

#[test]
fn test_resolution_helpers() {
    let resolution = Resolution::enabled(vec!["x".into()]);
    assert!(resolution.contains("x"));
    assert!(!resolution.contains("y"));
    assert!(!Resolution::disabled().enabled);
}

fn common_form() -> FormData {
    common::form(json!({ "name": "Ada", "blank": "", "count": 3 }))
}
