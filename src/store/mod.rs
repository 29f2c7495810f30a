//! The in-memory store for ticket types and tickets.
//!
//! [`TicketStore`] keeps the schema registry and the ticket repository behind a
//! single lock. Operations that check one side before mutating the other, such
//! as deleting a ticket type only when no ticket uses it or creating a ticket
//! only when its type exists, run inside one write critical section, so a
//! concurrent caller can never slip in between the check and the write.

use crate::data::{FormData, Snapshot, Ticket, TicketPatch, TicketStatus};
use crate::error::{RegistryError, StoreBuildError, TicketError};
use crate::resolution::Resolver;
use crate::schema::TicketType;
use parking_lot::RwLock;

mod builder;
pub mod registry;
pub mod repository;

pub use builder::TicketStoreBuilder;
pub use registry::{SchemaRegistry, UsageSource};
pub use repository::{Clock, IdGenerator, SystemClock, TicketRepository, UuidIds};

#[derive(Debug, Default)]
struct StoreState {
    registry: SchemaRegistry,
    repository: TicketRepository,
}

/// Thread-safe facade over the schema registry and ticket repository.
pub struct TicketStore {
    state: RwLock<StoreState>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore {
    /// An empty store with uuid ids and the system clock.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            ids: Box::new(UuidIds),
            clock: Box::new(SystemClock),
        }
    }

    pub fn builder() -> TicketStoreBuilder {
        TicketStoreBuilder::new()
    }

    /// A store holding the bundled fixture ticket types and tickets.
    pub fn seeded() -> Result<Self, StoreBuildError> {
        Self::builder().with_seed_data().build()
    }

    /// Rebuilds a store from a snapshot, re-checking every ticket type and ticket.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreBuildError> {
        Self::builder().with_snapshot(snapshot).build()
    }

    // --- Ticket types ---

    pub fn create_ticket_type(&self, ticket_type: TicketType) -> Result<(), RegistryError> {
        self.state.write().registry.create(ticket_type)
    }

    /// Replaces the definition with the same id and returns the previous one.
    pub fn update_ticket_type(&self, ticket_type: TicketType) -> Result<TicketType, RegistryError> {
        let mut state = self.state.write();
        let StoreState {
            registry,
            repository,
        } = &mut *state;
        registry.update(ticket_type, &*repository)
    }

    /// Deletes a ticket type unless tickets still reference it.
    pub fn delete_ticket_type(&self, id: &str) -> Result<TicketType, RegistryError> {
        let mut state = self.state.write();
        let StoreState {
            registry,
            repository,
        } = &mut *state;
        registry.delete(id, &*repository)
    }

    pub fn get_ticket_type(&self, id: &str) -> Option<TicketType> {
        let found = self.state.read().registry.get(id).cloned();
        tracing::debug!(ticket_type = id, found = found.is_some(), "get ticket type");
        found
    }

    pub fn list_ticket_types(&self) -> Vec<TicketType> {
        self.state
            .read()
            .registry
            .list()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of stored tickets of type `ticket_type_id`.
    pub fn usage_count(&self, ticket_type_id: &str) -> usize {
        self.state.read().repository.usage_count(ticket_type_id)
    }

    /// Resolves `field_id` of the stored ticket type `ticket_type_id`.
    ///
    /// Returns `None` when the ticket type does not exist.
    pub fn resolve_options_for(
        &self,
        ticket_type_id: &str,
        field_id: &str,
        values: &FormData,
    ) -> Option<Vec<String>> {
        let state = self.state.read();
        let ticket_type = state.registry.get(ticket_type_id)?;
        Some(Resolver::new(ticket_type).options(field_id, values))
    }

    // --- Tickets ---

    pub fn create_ticket(
        &self,
        ticket_type_id: &str,
        form_data: FormData,
    ) -> Result<Ticket, TicketError> {
        let mut state = self.state.write();
        let StoreState {
            registry,
            repository,
        } = &mut *state;
        repository.create(
            registry,
            ticket_type_id,
            form_data,
            self.ids.as_ref(),
            self.clock.as_ref(),
        )
    }

    pub fn update_ticket(&self, id: &str, patch: TicketPatch) -> Result<Ticket, TicketError> {
        let mut state = self.state.write();
        let StoreState {
            registry,
            repository,
        } = &mut *state;
        repository.update(registry, id, patch)
    }

    pub fn delete_ticket(&self, id: &str) -> Result<Ticket, TicketError> {
        self.state.write().repository.delete(id)
    }

    pub fn set_ticket_status(&self, id: &str, status: TicketStatus) -> Result<Ticket, TicketError> {
        self.state.write().repository.set_status(id, status)
    }

    pub fn get_ticket(&self, id: &str) -> Option<Ticket> {
        let found = self.state.read().repository.get(id).cloned();
        tracing::debug!(ticket = id, found = found.is_some(), "get ticket");
        found
    }

    /// All tickets, newest first.
    pub fn list_tickets(&self) -> Vec<Ticket> {
        self.state
            .read()
            .repository
            .list()
            .into_iter()
            .cloned()
            .collect()
    }

    /// A consistent copy of the whole store, taken under one read lock.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            ticket_types: state.registry.list().into_iter().cloned().collect(),
            tickets: state.repository.list().into_iter().cloned().collect(),
        }
    }

    pub(crate) fn from_parts(
        registry: SchemaRegistry,
        repository: TicketRepository,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            state: RwLock::new(StoreState {
                registry,
                repository,
            }),
            ids,
            clock,
        }
    }
}
