use super::definition::TicketType;
use super::field::{FieldDefinition, FieldKind, FieldType, OptionsMap};
use crate::error::ConversionError;
use serde::Deserialize;

/// Rating scale used when a builder submission leaves `max` out.
pub const DEFAULT_RATING_MAX: u32 = 5;

/// A trait for custom data models that can be converted into a `TicketType`.
///
/// This is the extension point for accepting ticket type definitions in
/// formats other than the canonical one. Implement it on your own structs to
/// provide a translation layer; the result still has to pass the registry's
/// structural checks when submitted.
///
/// # Example
///
/// ```rust,no_run
/// use ticketry::prelude::*;
/// use ticketry::error::ConversionError;
///
/// struct Questionnaire { title: String, questions: Vec<String> }
///
/// impl IntoTicketType for Questionnaire {
///     fn into_ticket_type(self) -> std::result::Result<TicketType, ConversionError> {
///         let fields = self
///             .questions
///             .iter()
///             .enumerate()
///             .map(|(i, q)| FieldDefinition::textarea(format!("q{}", i + 1), q.as_str()))
///             .collect();
///         Ok(TicketType::from_name(self.title, fields))
///     }
/// }
/// ```
pub trait IntoTicketType {
    /// Consumes the object and converts it into a ticket type definition.
    fn into_ticket_type(self) -> Result<TicketType, ConversionError>;
}

impl IntoTicketType for TicketType {
    fn into_ticket_type(self) -> Result<TicketType, ConversionError> {
        Ok(self)
    }
}

/// Either a list of strings or a single comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionsInput {
    List(Vec<String>),
    Text(String),
}

impl OptionsInput {
    fn into_options(self) -> Vec<String> {
        match self {
            OptionsInput::List(list) => list
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            OptionsInput::Text(text) => split_options(&text),
        }
    }
}

/// Either a JSON object or JSON text describing one, as typed into a text box.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionsMapInput {
    Map(OptionsMap),
    Text(String),
}

/// A ticket type as submitted by a form-based builder: loose field types,
/// comma-separated options and an `optionsMap` that may still be raw JSON text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderForm {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<BuilderField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderField {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<OptionsInput>,
    #[serde(default)]
    pub depends_on: Option<String>,
    #[serde(default)]
    pub options_map: Option<OptionsMapInput>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl IntoTicketType for BuilderForm {
    fn into_ticket_type(self) -> Result<TicketType, ConversionError> {
        if self.name.trim().is_empty() {
            return Err(ConversionError::ValidationError(
                "ticket type name is required".to_string(),
            ));
        }

        let fields = self
            .fields
            .into_iter()
            .map(BuilderField::into_field)
            .collect::<Result<Vec<_>, _>>()?;

        let name = self.name.trim().to_string();
        Ok(match self.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => TicketType::new(id, name, fields),
            None => TicketType::from_name(name, fields),
        })
    }
}

impl BuilderField {
    fn into_field(self) -> Result<FieldDefinition, ConversionError> {
        let field_type: FieldType =
            self.field_type
                .parse()
                .map_err(|_| ConversionError::UnknownFieldType {
                    field_id: self.id.clone(),
                    type_name: self.field_type.clone(),
                })?;

        let options = self
            .options
            .map(OptionsInput::into_options)
            .unwrap_or_default();

        let kind = match field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Textarea => FieldKind::Textarea,
            FieldType::Date => FieldKind::Date,
            FieldType::Number => FieldKind::Number {
                min: self.min,
                max: self.max,
            },
            FieldType::Dropdown => FieldKind::Dropdown { options },
            FieldType::Checkbox => FieldKind::Checkbox { options },
            FieldType::Radio => FieldKind::Radio { options },
            FieldType::Rating => FieldKind::Rating {
                max: rating_max(&self.id, self.max)?,
            },
            FieldType::DynamicDropdown => FieldKind::DynamicDropdown {
                depends_on: self.depends_on.unwrap_or_default(),
                options_map: parse_options_map(&self.id, self.options_map)?,
            },
        };

        Ok(FieldDefinition {
            id: self.id.trim().to_string(),
            label: self.label,
            required: self.required,
            kind,
        })
    }
}

fn split_options(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn rating_max(field_id: &str, max: Option<f64>) -> Result<u32, ConversionError> {
    match max {
        None => Ok(DEFAULT_RATING_MAX),
        Some(m) if m.fract() == 0.0 && m >= 1.0 && m <= f64::from(u32::MAX) => Ok(m as u32),
        Some(m) => Err(ConversionError::ValidationError(format!(
            "rating field '{}' needs a positive whole number as max, got {}",
            field_id, m
        ))),
    }
}

fn parse_options_map(
    field_id: &str,
    input: Option<OptionsMapInput>,
) -> Result<OptionsMap, ConversionError> {
    let map = match input {
        None => OptionsMap::new(),
        Some(OptionsMapInput::Map(map)) => map,
        Some(OptionsMapInput::Text(text)) if text.trim().is_empty() => OptionsMap::new(),
        Some(OptionsMapInput::Text(text)) => {
            serde_json::from_str(&text).map_err(|e| ConversionError::InvalidOptionsMap {
                field_id: field_id.to_string(),
                message: e.to_string(),
            })?
        }
    };

    Ok(map
        .into_iter()
        .map(|(parent, children)| {
            let children = children
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            (parent, children)
        })
        .collect())
}
