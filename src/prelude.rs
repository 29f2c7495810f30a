//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the ticketry crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use ticketry::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let snapshot = Snapshot::from_file("path/to/store.json")?;
//! let store = TicketStore::from_snapshot(snapshot)?;
//!
//! for ticket_type in store.list_ticket_types() {
//!     println!("{} ({} tickets)", ticket_type.name, store.usage_count(&ticket_type.id));
//! }
//! # Ok(())
//! # }
//! ```

// Schema model
pub use crate::schema::{
    BuilderForm, FieldDefinition, FieldKind, FieldType, IntoTicketType, OptionsMap, TicketType,
};

// Resolution and validation
pub use crate::resolution::{FormState, Resolution, Resolver, resolve_options};
pub use crate::validation::{ValidationResult, validate};

// Store
pub use crate::store::{Clock, IdGenerator, TicketStore, TicketStoreBuilder};

// Data structures
pub use crate::data::{FormData, Snapshot, Ticket, TicketPatch, TicketStatus};

// Error types
pub use crate::error::{
    FieldError, FieldErrorReason, RegistryError, SchemaError, TicketError, ValidationErrors,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
