use super::{Resolution, Resolver};
use crate::data::FormData;
use crate::error::ResolutionError;
use crate::schema::TicketType;
use serde_json::Value;

/// The in-progress values of a form being filled against one ticket type.
///
/// Every change goes through [`FormState::set`], which applies the cascade
/// reset: when a field's value changes, every field that depends on it,
/// directly or through intermediate dynamic dropdowns, is cleared. Cleared
/// fields are removed even if their old value is still offered by the new
/// option set, so the form never holds a value chosen under a different
/// parent.
pub struct FormState<'a> {
    resolver: Resolver<'a>,
    values: FormData,
}

impl<'a> FormState<'a> {
    pub fn new(ticket_type: &'a TicketType) -> Self {
        Self::with_values(ticket_type, FormData::new())
    }

    /// Starts from existing values, e.g. when editing a stored ticket.
    pub fn with_values(ticket_type: &'a TicketType, values: FormData) -> Self {
        Self {
            resolver: Resolver::new(ticket_type),
            values,
        }
    }

    /// Sets `field_id` to `value` and returns the ids of dependent fields
    /// whose values were cleared as a result.
    ///
    /// Setting a field to the value it already holds changes nothing.
    /// An empty value (`null`, `""` or `[]`) removes the field.
    pub fn set(
        &mut self,
        field_id: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<String>, ResolutionError> {
        let ticket_type = self.resolver.ticket_type();
        if !ticket_type.has_field(field_id) {
            return Err(ResolutionError::UnknownField {
                ticket_type_id: ticket_type.id.clone(),
                field_id: field_id.to_string(),
            });
        }

        let value = value.into();
        let new_value = (!is_empty_value(&value)).then_some(value);
        if self.values.get(field_id) == new_value.as_ref() {
            return Ok(Vec::new());
        }

        match new_value {
            Some(v) => {
                self.values.insert(field_id.to_string(), v);
            }
            None => {
                self.values.shift_remove(field_id);
            }
        }

        let cleared: Vec<String> = ticket_type
            .transitive_dependents(field_id)
            .into_iter()
            .filter(|dependent| self.values.shift_remove(&dependent.id).is_some())
            .map(|dependent| dependent.id.clone())
            .collect();

        if !cleared.is_empty() {
            tracing::debug!(
                ticket_type = %ticket_type.id,
                field = field_id,
                cleared = ?cleared,
                "cascade reset cleared dependent fields"
            );
        }
        Ok(cleared)
    }

    /// Clears `field_id`; shorthand for setting it to `null`.
    pub fn clear(&mut self, field_id: &str) -> Result<Vec<String>, ResolutionError> {
        self.set(field_id, Value::Null)
    }

    pub fn value(&self, field_id: &str) -> Option<&Value> {
        self.values.get(field_id)
    }

    pub fn resolution(&self, field_id: &str) -> Option<Resolution> {
        self.resolver.resolve(field_id, &self.values)
    }

    pub fn options(&self, field_id: &str) -> Vec<String> {
        self.resolver.options(field_id, &self.values)
    }

    pub fn is_enabled(&self, field_id: &str) -> bool {
        self.resolution(field_id).is_some_and(|r| r.enabled)
    }

    pub fn values(&self) -> &FormData {
        &self.values
    }

    pub fn into_values(self) -> FormData {
        self.values
    }
}

/// `null`, the empty string and the empty array count as "no value".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
    }
}
