//! Option resolution for dependent fields.
//!
//! A dynamic dropdown's options come from its `optionsMap`, keyed by the
//! current value of the field it depends on. The same rule applies at every
//! level of a chain: a field only counts as having a value once it is itself
//! enabled, so a third-level dropdown stays disabled until both levels above
//! it hold non-empty values.

use crate::data::FormData;
use crate::schema::{FieldKind, TicketType};
use ahash::AHashMap;
use serde::Serialize;

mod cascade;

pub use cascade::{FormState, is_empty_value};

/// The selectable options of one field given the current form values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Resolution {
    /// `false` when the field's parent has no value yet.
    pub enabled: bool,
    pub options: Vec<String>,
}

impl Resolution {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            options: Vec::new(),
        }
    }

    pub fn enabled(options: Vec<String>) -> Self {
        Self {
            enabled: true,
            options,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// Resolves option sets for the fields of one ticket type.
///
/// A `Resolver` is cheap to build and borrows the ticket type; it can be used
/// repeatedly against different sets of form values.
pub struct Resolver<'a> {
    ticket_type: &'a TicketType,
    positions: AHashMap<&'a str, usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(ticket_type: &'a TicketType) -> Self {
        let mut positions = AHashMap::with_capacity(ticket_type.fields.len());
        for (i, field) in ticket_type.fields.iter().enumerate() {
            positions.entry(field.id.as_str()).or_insert(i);
        }
        Self {
            ticket_type,
            positions,
        }
    }

    pub fn ticket_type(&self) -> &'a TicketType {
        self.ticket_type
    }

    /// Resolves `field_id`, or `None` if the ticket type has no such field.
    pub fn resolve(&self, field_id: &str, values: &FormData) -> Option<Resolution> {
        let position = *self.positions.get(field_id)?;
        Some(self.resolve_at(position, values, 0))
    }

    /// The selectable options for `field_id`; empty for unknown or disabled fields.
    pub fn options(&self, field_id: &str, values: &FormData) -> Vec<String> {
        self.resolve(field_id, values)
            .map(|r| r.options)
            .unwrap_or_default()
    }

    /// Resolves every field in declaration order.
    pub fn resolve_all(&self, values: &FormData) -> Vec<(&'a str, Resolution)> {
        self.ticket_type
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.as_str(), self.resolve_at(i, values, 0)))
            .collect()
    }

    /// The value of `field_id` as seen by fields depending on it: a non-empty
    /// string held by an enabled field.
    pub fn effective_value<'v>(&self, field_id: &str, values: &'v FormData) -> Option<&'v str> {
        let position = *self.positions.get(field_id)?;
        self.effective_value_at(position, values, 0)
    }

    fn resolve_at(&self, position: usize, values: &FormData, depth: usize) -> Resolution {
        let field = &self.ticket_type.fields[position];
        match &field.kind {
            FieldKind::Dropdown { options }
            | FieldKind::Checkbox { options }
            | FieldKind::Radio { options } => Resolution::enabled(options.clone()),
            FieldKind::DynamicDropdown {
                depends_on,
                options_map,
            } => {
                let parent_value = self
                    .positions
                    .get(depends_on.as_str())
                    .and_then(|&p| self.effective_value_at(p, values, depth + 1));

                match parent_value {
                    None => Resolution::disabled(),
                    Some(parent_value) => Resolution::enabled(
                        options_map.get(parent_value).cloned().unwrap_or_default(),
                    ),
                }
            }
            FieldKind::Text
            | FieldKind::Textarea
            | FieldKind::Number { .. }
            | FieldKind::Date
            | FieldKind::Rating { .. } => Resolution::enabled(Vec::new()),
        }
    }

    fn effective_value_at<'v>(
        &self,
        position: usize,
        values: &'v FormData,
        depth: usize,
    ) -> Option<&'v str> {
        // A chain can never be longer than the field list; deeper means a cycle.
        if depth > self.ticket_type.fields.len() {
            tracing::warn!(
                ticket_type = %self.ticket_type.id,
                "dependency cycle detected while resolving options"
            );
            return None;
        }

        let field = &self.ticket_type.fields[position];
        let value = values
            .get(&field.id)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())?;

        if field.depends_on().is_some() && !self.resolve_at(position, values, depth).enabled {
            return None;
        }
        Some(value)
    }
}

/// Computes the selectable options of `field_id` in `ticket_type` for the
/// given in-progress values.
///
/// Static option fields always return their options. A dynamic dropdown
/// returns `[]` while its parent is empty, and also when the parent's value
/// has no entry in its `optionsMap`. Unknown fields return `[]`.
pub fn resolve_options(ticket_type: &TicketType, field_id: &str, values: &FormData) -> Vec<String> {
    let options = Resolver::new(ticket_type).options(field_id, values);
    tracing::debug!(
        ticket_type = %ticket_type.id,
        field = field_id,
        count = options.len(),
        "resolved options"
    );
    options
}
