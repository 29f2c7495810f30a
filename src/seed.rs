//! Bundled fixture data: two ticket types and six tickets.
//!
//! `quality-monitoring` carries the three-level
//! `errorCategory -> errorSubType -> specificIssue` chain; `coaching-session`
//! is a plain form that no seeded ticket blocks from deletion once its single
//! ticket is gone.

use crate::data::{FormData, Ticket, TicketStatus};
use crate::schema::{FieldDefinition, TicketType};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};

pub const QUALITY_MONITORING: &str = "quality-monitoring";
pub const COACHING_SESSION: &str = "coaching-session";

/// 2023-01-01T00:00:00Z, the day the fixture tickets start.
const FIRST_DAY: i64 = 1_672_531_200;
const SECONDS_PER_DAY: i64 = 86_400;

pub fn ticket_types() -> Vec<TicketType> {
    vec![quality_monitoring(), coaching_session()]
}

pub fn quality_monitoring() -> TicketType {
    TicketType::new(
        QUALITY_MONITORING,
        "Quality Monitoring Call Review",
        vec![
            FieldDefinition::text("employeeName", "Employee Name").required(),
            FieldDefinition::date("callDate", "Call Date").required(),
            FieldDefinition::dropdown(
                "errorCategory",
                "Error Category",
                [
                    "Communication Errors",
                    "Technical Errors",
                    "Procedural Errors",
                    "Compliance Errors",
                ],
            )
            .required(),
            FieldDefinition::dynamic_dropdown(
                "errorSubType",
                "Error Sub-Type",
                "errorCategory",
                [
                    (
                        "Communication Errors",
                        vec![
                            "Poor Greeting",
                            "Improper Closing",
                            "Unclear Explanation",
                            "Tone Issues",
                        ],
                    ),
                    (
                        "Technical Errors",
                        vec![
                            "System Navigation",
                            "Data Entry Mistakes",
                            "Tool Misuse",
                            "Documentation Errors",
                        ],
                    ),
                    (
                        "Procedural Errors",
                        vec![
                            "Incorrect Process",
                            "Failed Verification",
                            "Missed Opportunity",
                        ],
                    ),
                    (
                        "Compliance Errors",
                        vec!["Disclosure Missing", "Data Privacy Breach"],
                    ),
                ],
            )
            .required(),
            FieldDefinition::dynamic_dropdown(
                "specificIssue",
                "Specific Issue",
                "errorSubType",
                [
                    (
                        "Poor Greeting",
                        ["Did not state name", "Sounded unenthusiastic"],
                    ),
                    (
                        "Improper Closing",
                        ["Did not thank customer", "Abrupt ending"],
                    ),
                    ("System Navigation", ["Slow to find info", "Used wrong tool"]),
                    (
                        "Data Entry Mistakes",
                        ["Incorrect customer ID", "Typo in address"],
                    ),
                ],
            )
            .required(),
            FieldDefinition::rating("overallRating", "Overall Rating", 5).required(),
            FieldDefinition::textarea("notes", "Detailed Notes"),
        ],
    )
}

pub fn coaching_session() -> TicketType {
    TicketType::new(
        COACHING_SESSION,
        "Coaching Session",
        vec![
            FieldDefinition::text("employeeName", "Employee Name").required(),
            FieldDefinition::date("sessionDate", "Session Date").required(),
            FieldDefinition::textarea("strengths", "Strengths Discussed").required(),
            FieldDefinition::textarea("opportunities", "Opportunities for Improvement")
                .required(),
            FieldDefinition::textarea("actionPlan", "Action Plan").required(),
        ],
    )
}

pub fn tickets() -> Vec<Ticket> {
    vec![
        ticket(
            0,
            QUALITY_MONITORING,
            TicketStatus::Closed,
            json!({
                "employeeName": "Alice Johnson",
                "callDate": "2023-01-01",
                "errorCategory": "Communication Errors",
                "errorSubType": "Poor Greeting",
                "specificIssue": "Sounded unenthusiastic",
                "overallRating": 3,
                "notes": "Needs to be more energetic."
            }),
        ),
        ticket(
            1,
            QUALITY_MONITORING,
            TicketStatus::Closed,
            json!({
                "employeeName": "Bob Williams",
                "callDate": "2023-01-02",
                "errorCategory": "Technical Errors",
                "errorSubType": "System Navigation",
                "specificIssue": "Slow to find info",
                "overallRating": 2,
                "notes": "Took too long to find customer account."
            }),
        ),
        // "Incorrect Process" has no specific issues to choose from.
        ticket(
            2,
            QUALITY_MONITORING,
            TicketStatus::InProgress,
            json!({
                "employeeName": "Alice Johnson",
                "callDate": "2023-01-03",
                "errorCategory": "Procedural Errors",
                "errorSubType": "Incorrect Process",
                "overallRating": 4,
                "notes": "Followed script perfectly."
            }),
        ),
        ticket(
            3,
            COACHING_SESSION,
            TicketStatus::New,
            json!({
                "employeeName": "Bob Williams",
                "sessionDate": "2023-01-04",
                "strengths": "Good tone",
                "opportunities": "System navigation speed",
                "actionPlan": "Practice navigation exercises."
            }),
        ),
        ticket(
            4,
            QUALITY_MONITORING,
            TicketStatus::New,
            json!({
                "employeeName": "Charlie Brown",
                "callDate": "2023-01-05",
                "errorCategory": "Technical Errors",
                "errorSubType": "Data Entry Mistakes",
                "specificIssue": "Typo in address",
                "overallRating": 3,
                "notes": "Needs to double check entries."
            }),
        ),
        ticket(
            5,
            QUALITY_MONITORING,
            TicketStatus::Closed,
            json!({
                "employeeName": "Alice Johnson",
                "callDate": "2023-01-06",
                "errorCategory": "Communication Errors",
                "errorSubType": "Improper Closing",
                "specificIssue": "Abrupt ending",
                "overallRating": 5,
                "notes": "Great improvement on closing."
            }),
        ),
    ]
}

/// A fixture ticket created at noon UTC on day `day` after 2023-01-01.
fn ticket(day: i64, ticket_type_id: &str, status: TicketStatus, form_data: Value) -> Ticket {
    let midnight = FIRST_DAY + day * SECONDS_PER_DAY;
    Ticket {
        id: format!("TICKET-{}", midnight * 1000),
        ticket_type_id: ticket_type_id.to_string(),
        created_at: DateTime::<Utc>::UNIX_EPOCH
            + TimeDelta::seconds(midnight + SECONDS_PER_DAY / 2),
        status,
        form_data: into_form_data(form_data),
    }
}

fn into_form_data(value: Value) -> FormData {
    match value {
        Value::Object(map) => map,
        _ => FormData::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn every_fixture_ticket_is_valid_for_its_type() {
        let types = ticket_types();
        for ticket in tickets() {
            let tt = types
                .iter()
                .find(|t| t.id == ticket.ticket_type_id)
                .unwrap();
            assert!(validate(tt, &ticket.form_data).is_valid(), "{}", ticket.id);
        }
    }

    #[test]
    fn fixture_ids_and_timestamps_follow_the_calendar() {
        let tickets = tickets();
        assert_eq!(tickets[0].id, "TICKET-1672531200000");
        assert_eq!(tickets[1].id, "TICKET-1672617600000");
        assert_eq!(
            tickets[0].created_at.to_rfc3339(),
            "2023-01-01T12:00:00+00:00"
        );
    }
}
