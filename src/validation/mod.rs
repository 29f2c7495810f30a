use crate::data::FormData;
use crate::error::{FieldError, FieldErrorReason, ValidationErrors};
use crate::resolution::{Resolver, is_empty_value};
use crate::schema::{FieldKind, TicketType};

mod rules;

/// The outcome of checking a record's data against its ticket type.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid { errors: ValidationErrors },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { errors } => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { errors } => Err(errors),
        }
    }
}

/// Checks `form_data` against every field of `ticket_type`.
///
/// The walk is driven by the schema, not the submitted data, so missing
/// required fields are caught. At most one error is reported per declared
/// field; keys that the schema does not declare are reported after them.
/// Every violation is collected before returning.
///
/// A required dynamic dropdown whose parent is unset reports
/// [`FieldErrorReason::DependencyUnset`]. One whose parent is set but has no
/// entry in the `optionsMap` is not reported as missing: there is nothing
/// that could be selected.
pub fn validate(ticket_type: &TicketType, form_data: &FormData) -> ValidationResult {
    let resolver = Resolver::new(ticket_type);
    let mut errors = Vec::new();

    for field in &ticket_type.fields {
        let value = form_data.get(&field.id).filter(|v| !is_empty_value(v));

        let reason = match (&field.kind, value) {
            (FieldKind::DynamicDropdown { depends_on, .. }, value) => {
                let resolution = resolver
                    .resolve(&field.id, form_data)
                    .unwrap_or_default();
                match value {
                    None if !field.required => None,
                    _ if !resolution.enabled => Some(FieldErrorReason::DependencyUnset {
                        depends_on: depends_on.clone(),
                    }),
                    None if resolution.options.is_empty() => None,
                    None => Some(FieldErrorReason::Required),
                    Some(v) => rules::check_choice(v, &resolution.options),
                }
            }
            (_, None) if field.required => Some(FieldErrorReason::Required),
            (_, None) => None,
            (kind, Some(v)) => rules::check_value(kind, v),
        };

        if let Some(reason) = reason {
            errors.push(FieldError::new(field.id.clone(), reason));
        }
    }

    errors.extend(
        form_data
            .keys()
            .filter(|key| !ticket_type.has_field(key))
            .map(|key| FieldError::new(key.clone(), FieldErrorReason::UnknownField)),
    );

    if errors.is_empty() {
        tracing::debug!(ticket_type = %ticket_type.id, "form data is valid");
        ValidationResult::Valid
    } else {
        tracing::debug!(
            ticket_type = %ticket_type.id,
            errors = errors.len(),
            "form data is invalid"
        );
        ValidationResult::Invalid {
            errors: ValidationErrors(errors),
        }
    }
}
