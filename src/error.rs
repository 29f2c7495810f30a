use crate::schema::FieldType;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single structural problem found in a ticket type definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    #[error("Ticket type id must not be empty")]
    EmptyId,

    #[error("Ticket type id '{id}' may only contain lowercase letters, digits and '-'")]
    InvalidId { id: String },

    #[error("Ticket type name must not be empty")]
    EmptyName,

    #[error("Field at position {position} has an empty id")]
    EmptyFieldId { position: usize },

    #[error("Field id '{field_id}' is declared more than once")]
    DuplicateFieldId { field_id: String },

    #[error("Field '{field_id}' depends on itself")]
    SelfDependency { field_id: String },

    #[error("Field '{field_id}' depends on '{depends_on}', which is not declared")]
    MissingDependency { field_id: String, depends_on: String },

    #[error("Field '{field_id}' depends on '{depends_on}', which is declared after it")]
    ForwardDependency { field_id: String, depends_on: String },

    #[error(
        "Field '{field_id}' depends on '{depends_on}' of type '{parent_type}', which cannot drive dependent options"
    )]
    NonOptionParent {
        field_id: String,
        depends_on: String,
        parent_type: FieldType,
    },

    #[error("Dependency cycle between fields: {}", .path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    #[error("Rating field '{field_id}' must allow at least one star")]
    InvalidRatingMax { field_id: String },

    #[error("Number field '{field_id}' has a minimum of {min} above its maximum of {max}")]
    InvalidNumberBounds { field_id: String, min: f64, max: f64 },

    #[error("Field '{field_id}' has no options to choose from")]
    EmptyOptions { field_id: String },

    #[error("Field '{field_id}' lists option '{option}' more than once")]
    DuplicateOption { field_id: String, option: String },
}

/// Every structural violation found in one ticket type, in declaration order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Ticket type '{ticket_type_id}' is invalid: {}", join_display(.violations))]
pub struct SchemaError {
    pub ticket_type_id: String,
    pub violations: Vec<SchemaViolation>,
}

/// Errors raised by the schema registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("A ticket type with id '{id}' already exists")]
    DuplicateId { id: String },

    #[error("A ticket type named '{name}' already exists (id '{existing_id}')")]
    DuplicateName { name: String, existing_id: String },

    #[error(transparent)]
    InvalidSchema(#[from] SchemaError),

    #[error("Ticket type '{id}' not found")]
    NotFound { id: String },

    #[error("Cannot delete ticket type '{id}': it is used by {count} ticket(s)")]
    InUse { id: String, count: usize },

    #[error(
        "Cannot remove field '{field_id}' from ticket type '{id}': {count} ticket(s) still hold a value for it"
    )]
    FieldInUse {
        id: String,
        field_id: String,
        count: usize,
    },
}

/// Why a single field of a submitted record was rejected.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "reason",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum FieldErrorReason {
    #[error("This field is required")]
    Required,

    #[error("Select a value for '{depends_on}' first")]
    DependencyUnset { depends_on: String },

    #[error("The ticket type does not declare this field")]
    UnknownField,

    #[error("Expected {expected}")]
    WrongType { expected: String },

    #[error("'{value}' is not one of the available options")]
    NotAnOption { value: String },

    #[error("'{value}' is selected more than once")]
    DuplicateSelection { value: String },

    #[error("{value} is below the minimum of {min}")]
    BelowMinimum { value: f64, min: f64 },

    #[error("{value} is above the maximum of {max}")]
    AboveMaximum { value: f64, max: f64 },

    #[error("Rating must be a whole number between 1 and {max}")]
    RatingOutOfRange { max: u32 },

    #[error("'{value}' is not a valid date")]
    InvalidDate { value: String },
}

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_id: String,
    #[serde(flatten)]
    pub reason: FieldErrorReason,
}

impl FieldError {
    pub fn new(field_id: impl Into<String>, reason: FieldErrorReason) -> Self {
        Self {
            field_id: field_id.into(),
            reason,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_id, self.reason)
    }
}

/// The aggregated field errors of one rejected record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// All errors reported against `field_id`.
    pub fn for_field<'a>(&'a self, field_id: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.0.iter().filter(move |e| e.field_id == field_id)
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field_id.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_display(&self.0))
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors raised by the ticket repository.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TicketError {
    #[error("Ticket '{id}' not found")]
    NotFound { id: String },

    #[error("Ticket type '{ticket_type_id}' does not exist")]
    UnknownType { ticket_type_id: String },

    #[error("Ticket id '{id}' is already taken")]
    DuplicateId { id: String },

    #[error("Ticket data is invalid: {0}")]
    Invalid(ValidationErrors),
}

/// Errors raised while resolving options or editing an in-progress form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Field '{field_id}' is not declared by ticket type '{ticket_type_id}'")]
    UnknownField {
        ticket_type_id: String,
        field_id: String,
    },
}

/// Errors that can occur when converting a custom format into a `TicketType`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),

    #[error("Field '{field_id}' has an unknown type: '{type_name}'")]
    UnknownFieldType { field_id: String, type_name: String },

    #[error("Field '{field_id}' has an unreadable options map: {message}")]
    InvalidOptionsMap { field_id: String, message: String },
}

/// Errors raised while assembling a store from seed data or a snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreBuildError {
    #[error("Failed to register ticket type: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to load ticket: {0}")]
    Ticket(#[from] TicketError),
}

/// Errors raised while reading or writing a store snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot content is inconsistent: {0}")]
    Build(#[from] StoreBuildError),
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items.iter().join("; ")
}
