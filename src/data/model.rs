use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Submitted record values keyed by field id, in insertion order.
pub type FormData = serde_json::Map<String, serde_json::Value>;

/// Lifecycle status of a ticket. Freely settable; no ordering is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::Closed,
    ];

    /// The nominal next status (New -> In Progress -> Closed). Informational only.
    pub fn next(&self) -> Option<TicketStatus> {
        match self {
            TicketStatus::New => Some(TicketStatus::InProgress),
            TicketStatus::InProgress => Some(TicketStatus::Closed),
            TicketStatus::Closed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A stored record instance of some ticket type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub ticket_type_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub form_data: FormData,
}

impl Ticket {
    /// The value submitted for `field_id`, if any.
    pub fn value(&self, field_id: &str) -> Option<&serde_json::Value> {
        self.form_data.get(field_id)
    }

    /// The value for `field_id` when it is a non-empty string.
    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.value(field_id)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// The mutable part of a ticket. Absent members are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FormData>,
}

impl TicketPatch {
    pub fn form_data(form_data: FormData) -> Self {
        Self {
            ticket_type_id: None,
            form_data: Some(form_data),
        }
    }

    pub fn retype(ticket_type_id: impl Into<String>, form_data: FormData) -> Self {
        Self {
            ticket_type_id: Some(ticket_type_id.into()),
            form_data: Some(form_data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ticket_type_id.is_none() && self.form_data.is_none()
    }
}
