//! Common test utilities for building ticket types, form data and stores.
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use ticketry::prelude::*;

/// Turns a `json!` object literal into form data.
#[allow(dead_code)]
pub fn form(value: Value) -> FormData {
    match value {
        Value::Object(map) => map,
        other => panic!("form data must be a JSON object, got {other}"),
    }
}

/// A store holding the bundled fixtures.
#[allow(dead_code)]
pub fn seeded_store() -> TicketStore {
    TicketStore::seeded().expect("fixture data should load")
}

/// A three-level chain `region -> country -> city` plus an unrelated field.
#[allow(dead_code)]
pub fn create_location_type() -> TicketType {
    TicketType::new(
        "location",
        "Location",
        vec![
            FieldDefinition::dropdown("region", "Region", ["Europe", "Asia"]).required(),
            FieldDefinition::dynamic_dropdown(
                "country",
                "Country",
                "region",
                [
                    ("Europe", vec!["France", "Norway"]),
                    ("Asia", vec!["Japan"]),
                ],
            )
            .required(),
            FieldDefinition::dynamic_dropdown(
                "city",
                "City",
                "country",
                [("France", vec!["Paris", "Lyon"]), ("Japan", vec!["Osaka"])],
            )
            .required(),
            FieldDefinition::text("notes", "Notes"),
        ],
    )
}

/// Valid form data for the quality-monitoring fixture.
#[allow(dead_code)]
pub fn quality_form(employee: &str) -> FormData {
    form(serde_json::json!({
        "employeeName": employee,
        "callDate": "2023-03-14",
        "errorCategory": "Communication Errors",
        "errorSubType": "Poor Greeting",
        "specificIssue": "Did not state name",
        "overallRating": 4
    }))
}

/// Valid form data for the coaching-session fixture.
#[allow(dead_code)]
pub fn coaching_form(employee: &str) -> FormData {
    form(serde_json::json!({
        "employeeName": employee,
        "sessionDate": "2023-03-15",
        "strengths": "Clear explanations",
        "opportunities": "Call pacing",
        "actionPlan": "Shadow a senior agent."
    }))
}

/// Hands out `T-0`, `T-1`, ... so tests can predict ticket ids.
#[allow(dead_code)]
pub struct SequentialIds(AtomicUsize);

#[allow(dead_code)]
impl SequentialIds {
    pub fn new() -> Self {
        Self(AtomicUsize::new(0))
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("T-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// A clock that starts at 2024-01-01T00:00:00Z and moves one minute per reading.
#[allow(dead_code)]
pub struct StepClock(AtomicUsize);

#[allow(dead_code)]
impl StepClock {
    pub fn new() -> Self {
        Self(AtomicUsize::new(0))
    }
}

impl Clock for StepClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        let step = self.0.fetch_add(1, Ordering::Relaxed) as i64;
        chrono::DateTime::<chrono::Utc>::UNIX_EPOCH
            + chrono::TimeDelta::seconds(1_704_067_200 + step * 60)
    }
}
