//! Structural checks for ticket type definitions.
//!
//! A ticket type is accepted only if its id is a lowercase slug
//! (`a-z`, `0-9`, `-`), every field id is unique, every
//! `dependsOn` reference names an earlier dropdown or dynamic dropdown, and
//! the dependency graph has no cycle. Every violation is collected so a
//! caller can fix a definition in one pass.

use super::definition::TicketType;
use super::field::{FieldDefinition, FieldKind};
use crate::error::{SchemaError, SchemaViolation};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// Checks `ticket_type` and returns every violation, or `Ok(())` if there are none.
pub fn check(ticket_type: &TicketType) -> Result<(), SchemaError> {
    let violations = violations(ticket_type);
    if violations.is_empty() {
        warn_unreachable_mappings(ticket_type);
        Ok(())
    } else {
        Err(SchemaError {
            ticket_type_id: ticket_type.id.clone(),
            violations,
        })
    }
}

/// Lists every structural violation of `ticket_type` in declaration order.
pub fn violations(ticket_type: &TicketType) -> Vec<SchemaViolation> {
    let mut out = Vec::new();

    if ticket_type.id.trim().is_empty() {
        out.push(SchemaViolation::EmptyId);
    } else if !TicketType::is_valid_id(&ticket_type.id) {
        out.push(SchemaViolation::InvalidId {
            id: ticket_type.id.clone(),
        });
    }
    if ticket_type.name.trim().is_empty() {
        out.push(SchemaViolation::EmptyName);
    }

    for (position, field) in ticket_type.fields.iter().enumerate() {
        if field.id.trim().is_empty() {
            out.push(SchemaViolation::EmptyFieldId { position });
        }
    }

    for field_id in ticket_type
        .fields
        .iter()
        .map(|f| f.id.as_str())
        .filter(|id| !id.trim().is_empty())
        .duplicates()
    {
        out.push(SchemaViolation::DuplicateFieldId {
            field_id: field_id.to_string(),
        });
    }

    for (position, field) in ticket_type.fields.iter().enumerate() {
        check_variant(field, &mut out);
        check_dependency(ticket_type, position, field, &mut out);
    }

    out.extend(
        dependency_cycles(ticket_type)
            .into_iter()
            .map(|path| SchemaViolation::DependencyCycle { path }),
    );

    out
}

fn check_variant(field: &FieldDefinition, out: &mut Vec<SchemaViolation>) {
    match &field.kind {
        FieldKind::Dropdown { options }
        | FieldKind::Checkbox { options }
        | FieldKind::Radio { options } => {
            if options.is_empty() {
                out.push(SchemaViolation::EmptyOptions {
                    field_id: field.id.clone(),
                });
            }
            for option in options.iter().duplicates() {
                out.push(SchemaViolation::DuplicateOption {
                    field_id: field.id.clone(),
                    option: option.clone(),
                });
            }
        }
        FieldKind::DynamicDropdown { options_map, .. } => {
            for option in options_map.values().flat_map(|children| children.iter().duplicates()) {
                out.push(SchemaViolation::DuplicateOption {
                    field_id: field.id.clone(),
                    option: option.clone(),
                });
            }
        }
        FieldKind::Rating { max } => {
            if *max == 0 {
                out.push(SchemaViolation::InvalidRatingMax {
                    field_id: field.id.clone(),
                });
            }
        }
        FieldKind::Number {
            min: Some(min),
            max: Some(max),
        } if min > max => {
            out.push(SchemaViolation::InvalidNumberBounds {
                field_id: field.id.clone(),
                min: *min,
                max: *max,
            });
        }
        FieldKind::Number { .. } | FieldKind::Text | FieldKind::Textarea | FieldKind::Date => {}
    }
}

fn check_dependency(
    ticket_type: &TicketType,
    position: usize,
    field: &FieldDefinition,
    out: &mut Vec<SchemaViolation>,
) {
    let Some(depends_on) = field.depends_on() else {
        return;
    };

    if depends_on == field.id {
        out.push(SchemaViolation::SelfDependency {
            field_id: field.id.clone(),
        });
        return;
    }

    let Some(parent_position) = ticket_type.position(depends_on) else {
        out.push(SchemaViolation::MissingDependency {
            field_id: field.id.clone(),
            depends_on: depends_on.to_string(),
        });
        return;
    };

    if parent_position > position {
        out.push(SchemaViolation::ForwardDependency {
            field_id: field.id.clone(),
            depends_on: depends_on.to_string(),
        });
    }

    let parent_type = ticket_type.fields[parent_position].field_type();
    if !parent_type.can_drive_dependents() {
        out.push(SchemaViolation::NonOptionParent {
            field_id: field.id.clone(),
            depends_on: depends_on.to_string(),
            parent_type,
        });
    }
}

/// Finds every cycle in the `dependsOn` graph. Each field has at most one
/// parent, so a cycle is found by walking parent links until a field repeats.
/// Each cycle is reported once, rotated to start at its smallest id.
/// Self-references are reported separately and skipped here.
fn dependency_cycles(ticket_type: &TicketType) -> Vec<Vec<String>> {
    let parents: AHashMap<&str, &str> = ticket_type
        .fields
        .iter()
        .filter_map(|f| f.depends_on().map(|p| (f.id.as_str(), p)))
        .filter(|(child, parent)| child != parent)
        .collect();

    let mut seen: AHashSet<Vec<String>> = AHashSet::new();
    let mut cycles = Vec::new();

    for start in ticket_type.fields.iter().map(|f| f.id.as_str()) {
        let mut path: Vec<&str> = vec![start];
        let mut current = start;

        while let Some(&parent) = parents.get(current) {
            if let Some(at) = path.iter().position(|id| *id == parent) {
                let cycle = normalize_cycle(&path[at..]);
                if seen.insert(cycle.clone()) {
                    cycles.push(cycle);
                }
                break;
            }
            path.push(parent);
            current = parent;
        }
    }
    cycles
}

/// Rotates a cycle to start at its smallest id and closes it by repeating that id.
fn normalize_cycle(cycle: &[&str]) -> Vec<String> {
    let start = cycle
        .iter()
        .position_min()
        .unwrap_or_default();
    let mut out: Vec<String> = cycle[start..]
        .iter()
        .chain(&cycle[..start])
        .map(|s| s.to_string())
        .collect();
    if let Some(first) = out.first().cloned() {
        out.push(first);
    }
    out
}

/// Logs `optionsMap` keys that the parent field can never produce. These are
/// harmless but usually point at a typo in the definition.
fn warn_unreachable_mappings(ticket_type: &TicketType) {
    for field in &ticket_type.fields {
        let FieldKind::DynamicDropdown {
            depends_on,
            options_map,
        } = &field.kind
        else {
            continue;
        };
        let Some(parent) = ticket_type.field(depends_on) else {
            continue;
        };
        let reachable = parent.possible_values();
        for key in options_map.keys().filter(|k| !reachable.contains(*k)) {
            tracing::warn!(
                ticket_type = %ticket_type.id,
                field = %field.id,
                parent = %depends_on,
                key = %key,
                "optionsMap key can never be selected by the parent field"
            );
        }
    }
}
