use crate::error::ConversionError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Maps a parent option value to the child options it unlocks.
pub type OptionsMap = BTreeMap<String, Vec<String>>;

/// The discriminant of a field, without its variant data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Dropdown,
    DynamicDropdown,
    Rating,
    Checkbox,
    Radio,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Date,
        FieldType::Dropdown,
        FieldType::DynamicDropdown,
        FieldType::Rating,
        FieldType::Checkbox,
        FieldType::Radio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Dropdown => "dropdown",
            FieldType::DynamicDropdown => "dynamic_dropdown",
            FieldType::Rating => "rating",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
        }
    }

    /// Only single-choice selects may be the target of a `dependsOn` reference.
    pub fn can_drive_dependents(&self) -> bool {
        matches!(self, FieldType::Dropdown | FieldType::DynamicDropdown)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConversionError::UnknownFieldType {
                field_id: String::new(),
                type_name: s.to_string(),
            })
    }
}

/// Variant-specific data of a field, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Date,
    Dropdown {
        options: Vec<String>,
    },
    DynamicDropdown {
        #[serde(rename = "dependsOn")]
        depends_on: String,
        #[serde(rename = "optionsMap", default)]
        options_map: OptionsMap,
    },
    Rating {
        max: u32,
    },
    Checkbox {
        options: Vec<String>,
    },
    Radio {
        options: Vec<String>,
    },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Textarea => FieldType::Textarea,
            FieldKind::Number { .. } => FieldType::Number,
            FieldKind::Date => FieldType::Date,
            FieldKind::Dropdown { .. } => FieldType::Dropdown,
            FieldKind::DynamicDropdown { .. } => FieldType::DynamicDropdown,
            FieldKind::Rating { .. } => FieldType::Rating,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::Radio { .. } => FieldType::Radio,
        }
    }

    /// The fixed option list of a dropdown, checkbox or radio field.
    pub fn static_options(&self) -> Option<&[String]> {
        match self {
            FieldKind::Dropdown { options }
            | FieldKind::Checkbox { options }
            | FieldKind::Radio { options } => Some(options.as_slice()),
            _ => None,
        }
    }

    pub fn depends_on(&self) -> Option<&str> {
        match self {
            FieldKind::DynamicDropdown { depends_on, .. } => Some(depends_on),
            _ => None,
        }
    }
}

/// One field of a ticket type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            kind,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Text)
    }

    pub fn textarea(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Textarea)
    }

    pub fn date(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Date)
    }

    pub fn number(
        id: impl Into<String>,
        label: impl Into<String>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self::new(id, label, FieldKind::Number { min, max })
    }

    pub fn dropdown<S: Into<String>>(
        id: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(id, label, FieldKind::Dropdown { options })
    }

    pub fn radio<S: Into<String>>(
        id: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(id, label, FieldKind::Radio { options })
    }

    pub fn checkbox<S: Into<String>>(
        id: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(id, label, FieldKind::Checkbox { options })
    }

    pub fn rating(id: impl Into<String>, label: impl Into<String>, max: u32) -> Self {
        Self::new(id, label, FieldKind::Rating { max })
    }

    /// A dynamic dropdown. `entries` pairs each parent value with its child options.
    pub fn dynamic_dropdown<K, V, C>(
        id: impl Into<String>,
        label: impl Into<String>,
        depends_on: impl Into<String>,
        entries: impl IntoIterator<Item = (K, C)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        C: IntoIterator<Item = V>,
    {
        let options_map = entries
            .into_iter()
            .map(|(parent, children)| {
                (
                    parent.into(),
                    children.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self::new(
            id,
            label,
            FieldKind::DynamicDropdown {
                depends_on: depends_on.into(),
                options_map,
            },
        )
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn depends_on(&self) -> Option<&str> {
        self.kind.depends_on()
    }

    /// Every value this field could ever hold, regardless of the state of a form.
    ///
    /// Dynamic dropdowns yield the union of all their mapped child options, in
    /// first-seen order. Free-form kinds yield nothing.
    pub fn possible_values(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Dropdown { options }
            | FieldKind::Checkbox { options }
            | FieldKind::Radio { options } => options.clone(),
            FieldKind::DynamicDropdown { options_map, .. } => {
                options_map.values().flatten().unique().cloned().collect()
            }
            FieldKind::Text
            | FieldKind::Textarea
            | FieldKind::Number { .. }
            | FieldKind::Date
            | FieldKind::Rating { .. } => Vec::new(),
        }
    }
}
