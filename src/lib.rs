//! # Ticketry - Custom Ticket Type Schema Engine
//!
//! **Ticketry** lets an application define its own structured record types
//! ("ticket types") out of typed fields and then store records ("tickets")
//! that are validated against those definitions. Fields can be dynamic
//! dropdowns whose options depend on the value chosen in an earlier field,
//! chained to any depth.
//!
//! ## Core Workflow
//!
//! 1.  **Define a Ticket Type**: Build a `TicketType` directly, or implement the
//!     `IntoTicketType` trait to translate your own format (a `BuilderForm`
//!     implementation for form-builder submissions ships with the crate).
//! 2.  **Register it**: Submit it to a `TicketStore`. Structural problems such as
//!     forward or cyclic `dependsOn` references are rejected up front.
//! 3.  **Fill a Form**: Drive a `FormState` while the user edits. It resolves the
//!     options of dependent fields and clears stale values when a parent changes.
//! 4.  **Submit**: `TicketStore::create_ticket` validates the data and stores the
//!     ticket, or returns every field error at once.
//!
//! ## Quick Start
//!
//! ```rust
//! use ticketry::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let store = TicketStore::seeded()?;
//!     let quality = store
//!         .get_ticket_type("quality-monitoring")
//!         .ok_or("missing fixture")?;
//!
//!     // Fill the form the way a UI would.
//!     let mut form = FormState::new(&quality);
//!     form.set("employeeName", "Dana Scully")?;
//!     form.set("callDate", "2023-02-01")?;
//!     form.set("errorCategory", "Technical Errors")?;
//!     assert!(form.options("errorSubType").contains(&"Tool Misuse".to_string()));
//!     form.set("errorSubType", "System Navigation")?;
//!     form.set("specificIssue", "Used wrong tool")?;
//!     form.set("overallRating", json!(4))?;
//!
//!     // Changing the category clears everything that depended on it.
//!     let cleared = form.set("errorCategory", "Compliance Errors")?;
//!     assert_eq!(cleared, vec!["errorSubType", "specificIssue"]);
//!     form.set("errorSubType", "Disclosure Missing")?;
//!
//!     let ticket = store.create_ticket("quality-monitoring", form.into_values())?;
//!     assert_eq!(ticket.status, TicketStatus::New);
//!
//!     // A type in use cannot be deleted.
//!     assert!(matches!(
//!         store.delete_ticket_type("quality-monitoring"),
//!         Err(RegistryError::InUse { count: 6, .. })
//!     ));
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod prelude;
pub mod report;
pub mod resolution;
pub mod schema;
pub mod seed;
pub mod store;
pub mod validation;
