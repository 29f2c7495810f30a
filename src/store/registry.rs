use crate::error::RegistryError;
use crate::schema::{TicketType, structure};
use ahash::AHashMap;

/// Answers "is this ticket type in use?" for the registry.
///
/// The ticket repository is the source of truth; the registry never keeps
/// its own counters.
pub trait UsageSource {
    /// Number of stored tickets whose type is `ticket_type_id`.
    fn usage_count(&self, ticket_type_id: &str) -> usize;

    /// Number of stored tickets of `ticket_type_id` with `field_id` in their form data.
    fn field_usage_count(&self, ticket_type_id: &str, field_id: &str) -> usize;
}

/// Owns the ticket type definitions.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    ticket_types: AHashMap<String, TicketType>,
    order: Vec<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new ticket type after checking its structure.
    pub fn create(&mut self, ticket_type: TicketType) -> Result<(), RegistryError> {
        if self.ticket_types.contains_key(&ticket_type.id) {
            return Err(RegistryError::DuplicateId {
                id: ticket_type.id,
            });
        }
        structure::check(&ticket_type)?;
        self.check_name_is_free(&ticket_type)?;

        tracing::info!(
            ticket_type = %ticket_type.id,
            fields = ticket_type.fields.len(),
            "ticket type created"
        );
        self.order.push(ticket_type.id.clone());
        self.ticket_types.insert(ticket_type.id.clone(), ticket_type);
        Ok(())
    }

    /// Replaces the name and fields of the ticket type with the same id.
    ///
    /// The id is only the lookup key and can never change through this path.
    /// Every check runs before anything is written, so a rejected update
    /// leaves the previous definition in place. Returns the replaced definition.
    pub fn update(
        &mut self,
        ticket_type: TicketType,
        usage: &impl UsageSource,
    ) -> Result<TicketType, RegistryError> {
        let Some(current) = self.ticket_types.get(&ticket_type.id) else {
            return Err(RegistryError::NotFound {
                id: ticket_type.id,
            });
        };
        structure::check(&ticket_type)?;
        self.check_name_is_free(&ticket_type)?;

        for removed in current
            .fields
            .iter()
            .filter(|f| !ticket_type.has_field(&f.id))
        {
            let count = usage.field_usage_count(&ticket_type.id, &removed.id);
            if count > 0 {
                return Err(RegistryError::FieldInUse {
                    id: ticket_type.id.clone(),
                    field_id: removed.id.clone(),
                    count,
                });
            }
        }

        tracing::info!(
            ticket_type = %ticket_type.id,
            fields = ticket_type.fields.len(),
            "ticket type updated"
        );
        let id = ticket_type.id.clone();
        let previous = self.ticket_types.insert(id.clone(), ticket_type);
        previous.ok_or(RegistryError::NotFound { id })
    }

    /// Removes the ticket type if no stored ticket references it.
    pub fn delete(
        &mut self,
        id: &str,
        usage: &impl UsageSource,
    ) -> Result<TicketType, RegistryError> {
        if !self.ticket_types.contains_key(id) {
            return Err(RegistryError::NotFound { id: id.to_string() });
        }

        let count = usage.usage_count(id);
        if count > 0 {
            tracing::warn!(ticket_type = id, count, "refusing to delete ticket type in use");
            return Err(RegistryError::InUse {
                id: id.to_string(),
                count,
            });
        }

        self.order.retain(|existing| existing != id);
        let removed = self
            .ticket_types
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;
        tracing::info!(ticket_type = id, "ticket type deleted");
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&TicketType> {
        self.ticket_types.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ticket_types.contains_key(id)
    }

    /// All ticket types in registration order.
    pub fn list(&self) -> Vec<&TicketType> {
        self.order
            .iter()
            .filter_map(|id| self.ticket_types.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names are unique ignoring case and surrounding whitespace.
    fn check_name_is_free(&self, ticket_type: &TicketType) -> Result<(), RegistryError> {
        let wanted = normalize_name(&ticket_type.name);
        match self
            .ticket_types
            .values()
            .find(|other| other.id != ticket_type.id && normalize_name(&other.name) == wanted)
        {
            Some(other) => Err(RegistryError::DuplicateName {
                name: ticket_type.name.clone(),
                existing_id: other.id.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
