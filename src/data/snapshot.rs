use super::model::Ticket;
use crate::error::SnapshotError;
use crate::schema::TicketType;
use serde::{Deserialize, Serialize};
use std::fs;

/// A point-in-time copy of every ticket type and ticket in a store.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the snapshot to `path` as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// The fixture data shipped with the crate.
    pub fn seed() -> Self {
        Self {
            ticket_types: crate::seed::ticket_types(),
            tickets: crate::seed::tickets(),
        }
    }
}
