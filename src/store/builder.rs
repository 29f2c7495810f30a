use super::{
    Clock, IdGenerator, SchemaRegistry, SystemClock, TicketRepository, TicketStore, UuidIds,
};
use crate::data::{Snapshot, Ticket};
use crate::error::StoreBuildError;
use crate::schema::TicketType;
use crate::seed;

/// Assembles a [`TicketStore`] from initial data and injected services.
///
/// Initial ticket types are registered first, in the order given, then the
/// initial tickets are loaded. Both go through the same checks as runtime
/// submissions, so a store can never start out inconsistent.
pub struct TicketStoreBuilder {
    ticket_types: Vec<TicketType>,
    tickets: Vec<Ticket>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for TicketStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStoreBuilder {
    pub fn new() -> Self {
        Self {
            ticket_types: Vec::new(),
            tickets: Vec::new(),
            ids: Box::new(UuidIds),
            clock: Box::new(SystemClock),
        }
    }

    /// Adds the bundled `quality-monitoring` and `coaching-session` fixtures.
    pub fn with_seed_data(mut self) -> Self {
        self.ticket_types.extend(seed::ticket_types());
        self.tickets.extend(seed::tickets());
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.ticket_types.extend(snapshot.ticket_types);
        self.tickets.extend(snapshot.tickets);
        self
    }

    pub fn with_ticket_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_types.push(ticket_type);
        self
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.tickets.push(ticket);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn build(self) -> Result<TicketStore, StoreBuildError> {
        let mut registry = SchemaRegistry::new();
        for ticket_type in self.ticket_types {
            registry.create(ticket_type)?;
        }

        let mut repository = TicketRepository::new();
        // Restore oldest first so insertion order matches creation order.
        let mut tickets = self.tickets;
        tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        for ticket in tickets {
            repository.restore(&registry, ticket)?;
        }

        tracing::info!(
            ticket_types = registry.len(),
            tickets = repository.len(),
            "ticket store ready"
        );
        Ok(TicketStore::from_parts(
            registry,
            repository,
            self.ids,
            self.clock,
        ))
    }
}
