//! Aggregations over stored tickets for reporting collaborators.
//!
//! Everything here is a pure function of a ticket slice. Rendering the
//! results is left to the caller.

use crate::data::{Ticket, TicketStatus};
use ahash::AHashMap;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Field ids the reports read from `formData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFields {
    pub employee: String,
    pub rating: String,
    pub category: String,
    pub sub_type: String,
}

impl Default for ReportFields {
    fn default() -> Self {
        Self {
            employee: "employeeName".to_string(),
            rating: "overallRating".to_string(),
            category: "errorCategory".to_string(),
            sub_type: "errorSubType".to_string(),
        }
    }
}

/// Narrows the tickets a report looks at. Unset members match everything.
///
/// Both date bounds are inclusive whole days in UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default)]
    pub ticket_type_id: Option<String>,
    #[serde(default)]
    pub employee_name: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, ticket: &Ticket, fields: &ReportFields) -> bool {
        let day = ticket.created_at.date_naive();
        if self.date_start.is_some_and(|start| day < start) {
            return false;
        }
        if self.date_end.is_some_and(|end| day > end) {
            return false;
        }
        if let Some(type_id) = &self.ticket_type_id {
            if &ticket.ticket_type_id != type_id {
                return false;
            }
        }
        if let Some(name) = &self.employee_name {
            if ticket.text(&fields.employee) != Some(name.as_str()) {
                return false;
            }
        }
        true
    }

    /// The tickets of `tickets` this filter keeps, in their original order.
    pub fn apply<'t>(&self, tickets: &'t [Ticket], fields: &ReportFields) -> Vec<&'t Ticket> {
        tickets.iter().filter(|t| self.matches(t, fields)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReport {
    pub employee_name: String,
    pub ticket_count: usize,
    /// Mean of the numeric ratings, rounded to two decimals; 0 when none were given.
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub category: String,
    pub sub_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub count: usize,
}

/// Ticket count and average rating per employee, in order of first appearance.
/// Tickets without an employee name are skipped.
pub fn agent_report<'t>(
    tickets: impl IntoIterator<Item = &'t Ticket>,
    fields: &ReportFields,
) -> Vec<AgentReport> {
    struct Tally {
        name: String,
        tickets: usize,
        rating_sum: f64,
        ratings: usize,
    }

    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut tallies: Vec<Tally> = Vec::new();

    for ticket in tickets {
        let Some(name) = ticket.text(&fields.employee) else {
            continue;
        };
        let slot = *index.entry(name).or_insert_with(|| {
            tallies.push(Tally {
                name: name.to_string(),
                tickets: 0,
                rating_sum: 0.0,
                ratings: 0,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        tally.tickets += 1;
        if let Some(rating) = ticket.value(&fields.rating).and_then(|v| v.as_f64()) {
            tally.rating_sum += rating;
            tally.ratings += 1;
        }
    }

    tallies
        .into_iter()
        .map(|t| AgentReport {
            employee_name: t.name,
            ticket_count: t.tickets,
            average_rating: if t.ratings > 0 {
                round2(t.rating_sum / t.ratings as f64)
            } else {
                0.0
            },
        })
        .collect()
}

/// Ticket counts per (category, sub-type) pair, in order of first appearance.
/// Tickets missing either value are skipped.
pub fn error_report<'t>(
    tickets: impl IntoIterator<Item = &'t Ticket>,
    fields: &ReportFields,
) -> Vec<ErrorReport> {
    let mut index: AHashMap<(&str, &str), usize> = AHashMap::new();
    let mut rows: Vec<ErrorReport> = Vec::new();

    for ticket in tickets {
        let (Some(category), Some(sub_type)) =
            (ticket.text(&fields.category), ticket.text(&fields.sub_type))
        else {
            continue;
        };
        match index.get(&(category, sub_type)) {
            Some(&slot) => rows[slot].count += 1,
            None => {
                index.insert((category, sub_type), rows.len());
                rows.push(ErrorReport {
                    category: category.to_string(),
                    sub_type: sub_type.to_string(),
                    count: 1,
                });
            }
        }
    }
    rows
}

/// Sums an error report per category, keeping the order categories first appear in.
pub fn category_totals(errors: &[ErrorReport]) -> Vec<CategoryTotal> {
    errors
        .iter()
        .map(|e| e.category.as_str())
        .unique()
        .map(|category| CategoryTotal {
            category: category.to_string(),
            count: errors
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.count)
                .sum(),
        })
        .collect()
}

/// Ticket counts for every status, including those with no tickets.
pub fn status_summary<'t>(tickets: impl IntoIterator<Item = &'t Ticket>) -> Vec<StatusCount> {
    let counts = tickets.into_iter().counts_by(|t| t.status);
    TicketStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts.get(status).copied().unwrap_or(0),
        })
        .collect()
}

/// Distinct non-empty employee names, in order of first appearance.
pub fn employees<'t>(
    tickets: impl IntoIterator<Item = &'t Ticket>,
    fields: &ReportFields,
) -> Vec<String> {
    tickets
        .into_iter()
        .filter_map(|t| t.text(&fields.employee))
        .unique()
        .map(str::to_string)
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(2.675_1), 2.68);
        assert_eq!(round2(4.0), 4.0);
    }
}
