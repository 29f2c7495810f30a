use super::registry::{SchemaRegistry, UsageSource};
use crate::data::{FormData, Ticket, TicketPatch, TicketStatus};
use crate::error::TicketError;
use crate::resolution::is_empty_value;
use crate::schema::TicketType;
use crate::validation;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// How many fresh ids are drawn before giving up on a colliding generator.
const MAX_ID_ATTEMPTS: usize = 16;

/// Produces ids for newly created tickets.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// `TICKET-<uuid v4>` ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        format!("TICKET-{}", Uuid::new_v4().simple())
    }
}

/// Source of creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Owns the stored tickets.
///
/// Usage counts are always computed by scanning the stored tickets, so they
/// can never drift from what is actually held.
#[derive(Debug, Clone, Default)]
pub struct TicketRepository {
    tickets: AHashMap<String, Ticket>,
    order: Vec<String>,
}

impl TicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `form_data` against `ticket_type_id` and stores a new ticket
    /// with status `New`. Keys holding an empty value are not stored.
    pub fn create(
        &mut self,
        registry: &SchemaRegistry,
        ticket_type_id: &str,
        form_data: FormData,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Ticket, TicketError> {
        let ticket_type = lookup_type(registry, ticket_type_id)?;
        check_form_data(ticket_type, &form_data)?;
        let form_data = without_empty_values(form_data);

        let id = self.fresh_id(ids)?;
        let ticket = Ticket {
            id: id.clone(),
            ticket_type_id: ticket_type_id.to_string(),
            created_at: clock.now(),
            status: TicketStatus::New,
            form_data,
        };

        tracing::info!(ticket = %id, ticket_type = ticket_type_id, "ticket created");
        self.order.push(id.clone());
        self.tickets.insert(id, ticket.clone());
        Ok(ticket)
    }

    /// Applies `patch` to the ticket `id`.
    ///
    /// The merged ticket type and form data are validated together; on any
    /// failure the stored ticket is left as it was. Id, creation time and
    /// status are never touched here.
    pub fn update(
        &mut self,
        registry: &SchemaRegistry,
        id: &str,
        patch: TicketPatch,
    ) -> Result<Ticket, TicketError> {
        let Some(current) = self.tickets.get(id) else {
            return Err(TicketError::NotFound { id: id.to_string() });
        };

        let ticket_type_id = patch
            .ticket_type_id
            .unwrap_or_else(|| current.ticket_type_id.clone());
        let form_data = patch
            .form_data
            .unwrap_or_else(|| current.form_data.clone());

        let ticket_type = lookup_type(registry, &ticket_type_id)?;
        check_form_data(ticket_type, &form_data)?;

        let ticket = self
            .tickets
            .get_mut(id)
            .ok_or_else(|| TicketError::NotFound { id: id.to_string() })?;
        ticket.ticket_type_id = ticket_type_id;
        ticket.form_data = without_empty_values(form_data);

        tracing::info!(ticket = id, ticket_type = %ticket.ticket_type_id, "ticket updated");
        Ok(ticket.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<Ticket, TicketError> {
        let removed = self
            .tickets
            .remove(id)
            .ok_or_else(|| TicketError::NotFound { id: id.to_string() })?;
        self.order.retain(|existing| existing != id);
        tracing::info!(ticket = id, ticket_type = %removed.ticket_type_id, "ticket deleted");
        Ok(removed)
    }

    /// Sets the status of ticket `id`. Any status may follow any other.
    pub fn set_status(&mut self, id: &str, status: TicketStatus) -> Result<Ticket, TicketError> {
        let ticket = self
            .tickets
            .get_mut(id)
            .ok_or_else(|| TicketError::NotFound { id: id.to_string() })?;
        tracing::info!(ticket = id, from = %ticket.status, to = %status, "ticket status changed");
        ticket.status = status;
        Ok(ticket.clone())
    }

    /// Stores a ticket that already has its id, timestamp and status, e.g. from
    /// seed data or a snapshot. It goes through the same checks as `create`.
    pub fn restore(
        &mut self,
        registry: &SchemaRegistry,
        mut ticket: Ticket,
    ) -> Result<(), TicketError> {
        if self.tickets.contains_key(&ticket.id) {
            return Err(TicketError::DuplicateId { id: ticket.id });
        }
        let ticket_type = lookup_type(registry, &ticket.ticket_type_id)?;
        check_form_data(ticket_type, &ticket.form_data)?;
        ticket.form_data = without_empty_values(ticket.form_data);

        tracing::debug!(ticket = %ticket.id, ticket_type = %ticket.ticket_type_id, "ticket restored");
        self.order.push(ticket.id.clone());
        self.tickets.insert(ticket.id.clone(), ticket);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.get(id)
    }

    /// All tickets, newest first. Tickets created at the same instant are
    /// ordered by most recent insertion.
    pub fn list(&self) -> Vec<&Ticket> {
        let mut tickets: Vec<&Ticket> = self
            .order
            .iter()
            .rev()
            .filter_map(|id| self.tickets.get(id))
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    fn fresh_id(&self, ids: &dyn IdGenerator) -> Result<String, TicketError> {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ids.next_id();
            if !self.tickets.contains_key(&id) {
                return Ok(id);
            }
            last = id;
        }
        tracing::warn!(ticket = %last, "id generator kept producing taken ids");
        Err(TicketError::DuplicateId { id: last })
    }
}

impl UsageSource for TicketRepository {
    fn usage_count(&self, ticket_type_id: &str) -> usize {
        self.tickets
            .values()
            .filter(|t| t.ticket_type_id == ticket_type_id)
            .count()
    }

    fn field_usage_count(&self, ticket_type_id: &str, field_id: &str) -> usize {
        self.tickets
            .values()
            .filter(|t| t.ticket_type_id == ticket_type_id)
            .filter(|t| t.form_data.contains_key(field_id))
            .count()
    }
}

fn lookup_type<'r>(
    registry: &'r SchemaRegistry,
    ticket_type_id: &str,
) -> Result<&'r TicketType, TicketError> {
    registry.get(ticket_type_id).ok_or_else(|| {
        tracing::warn!(ticket_type = ticket_type_id, "ticket references unknown type");
        TicketError::UnknownType {
            ticket_type_id: ticket_type_id.to_string(),
        }
    })
}

/// Drops `null`, `""` and `[]` entries, keeping the order of the rest.
fn without_empty_values(mut form_data: FormData) -> FormData {
    form_data.retain(|_, value| !is_empty_value(value));
    form_data
}

fn check_form_data(ticket_type: &TicketType, form_data: &FormData) -> Result<(), TicketError> {
    validation::validate(ticket_type, form_data)
        .into_result()
        .map_err(|errors| {
            tracing::warn!(
                ticket_type = %ticket_type.id,
                errors = errors.len(),
                "rejected ticket with invalid form data"
            );
            TicketError::Invalid(errors)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDefinition;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Sequential(AtomicUsize);

    impl IdGenerator for Sequential {
        fn next_id(&self) -> String {
            format!("T-{}", self.0.fetch_add(1, Ordering::Relaxed))
        }
    }

    struct Stuck;

    impl IdGenerator for Stuck {
        fn next_id(&self) -> String {
            "T-0".to_string()
        }
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .create(TicketType::new(
                "note",
                "Note",
                vec![FieldDefinition::text("body", "Body").required()],
            ))
            .unwrap();
        registry
    }

    fn body(text: &str) -> FormData {
        json!({ "body": text }).as_object().unwrap().clone()
    }

    #[test]
    fn colliding_generator_is_reported_instead_of_overwriting() {
        let registry = registry();
        let mut repo = TicketRepository::new();
        repo.create(&registry, "note", body("first"), &Stuck, &SystemClock)
            .unwrap();

        let err = repo
            .create(&registry, "note", body("second"), &Stuck, &SystemClock)
            .unwrap_err();
        assert_eq!(err, TicketError::DuplicateId { id: "T-0".into() });
        assert_eq!(repo.get("T-0").unwrap().text("body"), Some("first"));
    }

    #[test]
    fn field_usage_counts_stored_keys() {
        let registry = registry();
        let ids = Sequential(AtomicUsize::new(0));
        let mut repo = TicketRepository::new();
        repo.create(&registry, "note", body("x"), &ids, &SystemClock)
            .unwrap();

        assert_eq!(repo.usage_count("note"), 1);
        assert_eq!(repo.field_usage_count("note", "body"), 1);
        assert_eq!(repo.field_usage_count("note", "missing"), 0);
        assert_eq!(repo.usage_count("other"), 0);
    }

    #[test]
    fn empty_values_are_not_stored() {
        let mut registry = SchemaRegistry::new();
        registry
            .create(TicketType::new(
                "note",
                "Note",
                vec![
                    FieldDefinition::text("body", "Body").required(),
                    FieldDefinition::text("extra", "Extra"),
                    FieldDefinition::checkbox("tags", "Tags", ["a", "b"]),
                    FieldDefinition::date("due", "Due"),
                ],
            ))
            .unwrap();
        let form = json!({"body": "x", "extra": "", "tags": [], "due": null});
        let ids = Sequential(AtomicUsize::new(0));
        let mut repo = TicketRepository::new();

        let ticket = repo
            .create(&registry, "note", form.as_object().unwrap().clone(), &ids, &SystemClock)
            .unwrap();
        assert_eq!(ticket.form_data.keys().collect::<Vec<_>>(), ["body"]);
        assert_eq!(repo.get("T-0").unwrap().form_data.len(), 1);
        assert_eq!(repo.field_usage_count("note", "extra"), 0);
    }
}
