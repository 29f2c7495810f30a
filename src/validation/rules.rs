use crate::error::FieldErrorReason;
use crate::schema::FieldKind;
use chrono::{DateTime, NaiveDate};
use itertools::Itertools;
use serde_json::Value;

/// Checks the shape of a non-empty value against its field kind.
pub(super) fn check_value(kind: &FieldKind, value: &Value) -> Option<FieldErrorReason> {
    match kind {
        FieldKind::Text | FieldKind::Textarea => match value {
            Value::String(_) => None,
            _ => Some(wrong_type("text")),
        },
        FieldKind::Number { min, max } => check_number(value, *min, *max),
        FieldKind::Date => check_date(value),
        FieldKind::Dropdown { options } | FieldKind::Radio { options } => {
            check_choice(value, options)
        }
        FieldKind::Checkbox { options } => check_selection(value, options),
        FieldKind::Rating { max } => check_rating(value, *max),
        FieldKind::DynamicDropdown { .. } => None,
    }
}

/// A single string that must be one of `options`.
pub(super) fn check_choice(value: &Value, options: &[String]) -> Option<FieldErrorReason> {
    let Some(choice) = value.as_str() else {
        return Some(wrong_type("a single option"));
    };
    if options.iter().any(|o| o == choice) {
        None
    } else {
        Some(FieldErrorReason::NotAnOption {
            value: choice.to_string(),
        })
    }
}

fn check_selection(value: &Value, options: &[String]) -> Option<FieldErrorReason> {
    let Some(items) = value.as_array() else {
        return Some(wrong_type("a list of options"));
    };
    let mut selected = Vec::with_capacity(items.len());
    for item in items {
        let Some(choice) = item.as_str() else {
            return Some(wrong_type("a list of options"));
        };
        if !options.iter().any(|o| o == choice) {
            return Some(FieldErrorReason::NotAnOption {
                value: choice.to_string(),
            });
        }
        selected.push(choice);
    }
    selected
        .into_iter()
        .duplicates()
        .next()
        .map(|dup| FieldErrorReason::DuplicateSelection {
            value: dup.to_string(),
        })
}

fn check_number(value: &Value, min: Option<f64>, max: Option<f64>) -> Option<FieldErrorReason> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(number) = number.filter(|n| n.is_finite()) else {
        return Some(wrong_type("a number"));
    };

    if let Some(min) = min.filter(|min| number < *min) {
        return Some(FieldErrorReason::BelowMinimum { value: number, min });
    }
    if let Some(max) = max.filter(|max| number > *max) {
        return Some(FieldErrorReason::AboveMaximum { value: number, max });
    }
    None
}

fn check_date(value: &Value) -> Option<FieldErrorReason> {
    let Some(text) = value.as_str() else {
        return Some(wrong_type("a date"));
    };
    let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok();
    if parsed {
        None
    } else {
        Some(FieldErrorReason::InvalidDate {
            value: text.to_string(),
        })
    }
}

fn check_rating(value: &Value, max: u32) -> Option<FieldErrorReason> {
    let stars = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        _ => return Some(wrong_type("a rating")),
    };
    match stars {
        Some(s) if s >= 1 && s <= u64::from(max) => None,
        _ => Some(FieldErrorReason::RatingOutOfRange { max }),
    }
}

fn wrong_type(expected: &str) -> FieldErrorReason {
    FieldErrorReason::WrongType {
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_numeric_strings_within_bounds() {
        assert_eq!(check_number(&json!("12.5"), Some(0.0), Some(20.0)), None);
        assert_eq!(
            check_number(&json!(-1), Some(0.0), None),
            Some(FieldErrorReason::BelowMinimum { value: -1.0, min: 0.0 })
        );
        assert_eq!(check_number(&json!("abc"), None, None), Some(wrong_type("a number")));
    }

    #[test]
    fn ratings_must_be_whole_and_in_range() {
        assert_eq!(check_rating(&json!(5), 5), None);
        assert_eq!(check_rating(&json!(3.0), 5), None);
        assert_eq!(check_rating(&json!(0), 5), Some(FieldErrorReason::RatingOutOfRange { max: 5 }));
        assert_eq!(check_rating(&json!(2.5), 5), Some(FieldErrorReason::RatingOutOfRange { max: 5 }));
        assert_eq!(check_rating(&json!("4"), 5), Some(wrong_type("a rating")));
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        assert_eq!(check_date(&json!("2023-01-05")), None);
        assert_eq!(check_date(&json!("2023-01-05T12:00:00Z")), None);
        assert!(matches!(
            check_date(&json!("05/01/2023")),
            Some(FieldErrorReason::InvalidDate { .. })
        ));
    }

    #[test]
    fn checkbox_selection_rejects_duplicates() {
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(check_selection(&json!(["a", "b"]), &options), None);
        assert_eq!(
            check_selection(&json!(["a", "a"]), &options),
            Some(FieldErrorReason::DuplicateSelection { value: "a".into() })
        );
        assert_eq!(
            check_selection(&json!(["c"]), &options),
            Some(FieldErrorReason::NotAnOption { value: "c".into() })
        );
    }
}
