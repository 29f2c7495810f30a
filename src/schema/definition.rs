use super::field::FieldDefinition;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A ticket type: a named, ordered list of typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl TicketType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields,
        }
    }

    /// Creates a ticket type whose id is derived from its name with [`TicketType::slug_for`].
    pub fn from_name(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        let name = name.into();
        Self {
            id: Self::slug_for(&name),
            name,
            fields,
        }
    }

    /// Lowercases `name` and joins its words with `-`, e.g. "Compliance Audit" -> "compliance-audit".
    /// Characters other than ASCII letters, digits and `-` are dropped.
    pub fn slug_for(name: &str) -> String {
        name.split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                    .map(|c| c.to_ascii_lowercase())
                    .collect::<String>()
            })
            .filter(|word| !word.is_empty())
            .join("-")
    }

    /// Whether `id` is a non-empty run of lowercase ASCII letters, digits and `-`.
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn position(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == field_id)
    }

    pub fn has_field(&self, field_id: &str) -> bool {
        self.position(field_id).is_some()
    }

    /// Fields whose `dependsOn` names `field_id` directly.
    pub fn direct_dependents<'a>(
        &'a self,
        field_id: &'a str,
    ) -> impl Iterator<Item = &'a FieldDefinition> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.depends_on() == Some(field_id))
    }

    /// Every field that depends on `field_id`, directly or through intermediate
    /// dynamic dropdowns, in breadth-first order. The field itself is never included.
    pub fn transitive_dependents(&self, field_id: &str) -> Vec<&FieldDefinition> {
        let mut found: Vec<&FieldDefinition> = Vec::new();
        let mut queue = VecDeque::from([field_id]);

        while let Some(current) = queue.pop_front() {
            for child in self.fields.iter().filter(|f| f.depends_on() == Some(current)) {
                if child.id == field_id || found.iter().any(|f| f.id == child.id) {
                    continue;
                }
                found.push(child);
                queue.push_back(child.id.as_str());
            }
        }
        found
    }

    /// The chain of ancestors feeding `field_id`, root first. Stops early on a
    /// repeated id so malformed schemas cannot loop.
    pub fn dependency_chain(&self, field_id: &str) -> Vec<&FieldDefinition> {
        let mut chain: Vec<&FieldDefinition> = Vec::new();
        let mut current = self.field(field_id).and_then(|f| f.depends_on());

        while let Some(parent_id) = current {
            if parent_id == field_id || chain.iter().any(|f| f.id == parent_id) {
                break;
            }
            let Some(parent) = self.field(parent_id) else {
                break;
            };
            chain.push(parent);
            current = parent.depends_on();
        }
        chain.reverse();
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(TicketType::slug_for("Compliance Audit"), "compliance-audit");
        assert_eq!(TicketType::slug_for("  Coaching   Session "), "coaching-session");
        assert_eq!(TicketType::slug_for("QA"), "qa");
        assert_eq!(TicketType::slug_for("Q&A / Review"), "qa-review");
    }

    #[test]
    fn valid_ids_are_lowercase_slugs() {
        assert!(TicketType::is_valid_id("quality-monitoring"));
        assert!(TicketType::is_valid_id("team-2"));
        assert!(!TicketType::is_valid_id(""));
        assert!(!TicketType::is_valid_id("Quality Monitoring"));
        assert!(!TicketType::is_valid_id("a/b"));
        assert!(!TicketType::is_valid_id("caf\u{e9}"));
    }

    #[test]
    fn chain_and_dependents_follow_depends_on() {
        let tt = TicketType::from_name(
            "Chain",
            vec![
                FieldDefinition::dropdown("a", "A", ["x"]),
                FieldDefinition::dynamic_dropdown("b", "B", "a", [("x", ["y"])]),
                FieldDefinition::dynamic_dropdown("c", "C", "b", [("y", ["z"])]),
                FieldDefinition::text("d", "D"),
            ],
        );

        let chain: Vec<_> = tt.dependency_chain("c").iter().map(|f| f.id.as_str()).collect();
        assert_eq!(chain, ["a", "b"]);

        let dependents: Vec<_> = tt
            .transitive_dependents("a")
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(dependents, ["b", "c"]);
        assert!(tt.transitive_dependents("d").is_empty());
    }
}
