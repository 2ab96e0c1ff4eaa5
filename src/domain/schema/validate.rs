use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

use super::{Column, SqlType, Table};

/// Key reported for errors that concern the whole candidate.
pub const SHAPE_FIELD: &str = "__all__";

/// Insertable shape of a table: the fields a caller supplies on creation.
///
/// `validate` checks an untyped key-value candidate against the table's
/// insertable columns. Every violation is collected before returning, so the
/// caller sees all missing or malformed fields at once. Keys outside the
/// insertable shape (identity, `createdAt`, unknown keys) are dropped.
pub trait Insertable: DeserializeOwned + Sized {
    const TABLE: &'static Table;

    fn validate(candidate: &Value) -> Result<Self, ValidationErrors> {
        let Some(fields) = candidate.as_object() else {
            let mut errors = ValidationErrors::new();
            errors.add(
                SHAPE_FIELD,
                new_validation_error(
                    "invalid_shape",
                    format!("Expected a key-value record, received {}", json_kind(candidate)),
                ),
            );
            return Err(errors);
        };

        let accepted = check_fields(Self::TABLE, fields)?;

        serde_json::from_value(Value::Object(accepted)).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add(SHAPE_FIELD, new_validation_error("invalid_shape", e.to_string()));
            errors
        })
    }
}

fn check_fields(table: &Table, fields: &Map<String, Value>) -> Result<Map<String, Value>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut accepted = Map::new();

    for column in table.insertable_columns() {
        match fields.get(column.field) {
            None if column.is_required_on_insert() => {
                errors.add(column.field, missing(column));
            }
            None => {}
            Some(Value::Null) if column.is_required_on_insert() => {
                errors.add(column.field, missing(column));
            }
            Some(Value::Null) => {
                accepted.insert(column.field.to_string(), Value::Null);
            }
            Some(value) => match check_value(column, value) {
                Ok(()) => {
                    accepted.insert(column.field.to_string(), value.clone());
                }
                Err(e) => errors.add(column.field, e),
            },
        }
    }

    if errors.is_empty() {
        Ok(accepted)
    } else {
        tracing::debug!(
            table = table.name,
            fields = errors.field_errors().len(),
            "Rejected insert candidate"
        );
        Err(errors)
    }
}

fn check_value(column: &Column, value: &Value) -> Result<(), ValidationError> {
    let type_matches = match column.sql_type {
        SqlType::Serial | SqlType::Integer => value
            .as_i64()
            .is_some_and(|n| i32::try_from(n).is_ok()),
        SqlType::Text => value.is_string(),
        SqlType::Boolean => value.is_boolean(),
        SqlType::Timestamp => value.as_str().is_some_and(is_timestamp),
    };

    if !type_matches {
        let mut err = new_validation_error(
            "invalid_type",
            format!("Expected {}, received {}", column.sql_type.describe(), json_kind(value)),
        );
        err.add_param(Cow::Borrowed("expected"), &column.sql_type.describe());
        err.add_param(Cow::Borrowed("received"), &json_kind(value));
        return Err(err);
    }

    if let (Some(choices), Some(s)) = (column.choices, value.as_str()) {
        if !choices.contains(&s) {
            let mut err = new_validation_error(
                "invalid_choice",
                format!("Expected one of: {}", choices.join(", ")),
            );
            err.add_param(Cow::Borrowed("choices"), &choices);
            return Err(err);
        }
    }

    Ok(())
}

fn missing(column: &Column) -> ValidationError {
    let mut err = new_validation_error("required", format!("{} is required", column.field));
    err.add_param(Cow::Borrowed("expected"), &column.sql_type.describe());
    err
}

fn is_timestamp(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn new_validation_error(code: &'static str, msg: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(msg));
    err
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::schema::{EXPERIENCES, PROJECT_TAGS};

    fn codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn strips_generated_and_unknown_keys() {
        let candidate = json!({
            "projectId": 1,
            "tagId": 2,
            "createdAt": "2024-01-01T00:00:00Z",
            "extra": true
        });
        let accepted = check_fields(&PROJECT_TAGS, candidate.as_object().unwrap()).unwrap();
        assert_eq!(Value::Object(accepted), json!({"projectId": 1, "tagId": 2}));
    }

    #[test]
    fn integers_outside_i32_are_rejected() {
        let candidate = json!({"projectId": 1_i64 << 40, "tagId": 1.5});
        let errors = check_fields(&PROJECT_TAGS, candidate.as_object().unwrap()).unwrap_err();
        assert_eq!(codes(&errors, "projectId"), vec!["invalid_type"]);
        assert_eq!(codes(&errors, "tagId"), vec!["invalid_type"]);
    }

    #[test]
    fn experience_type_outside_choices_is_rejected() {
        let candidate = json!({"title": "a", "subtitle": "b", "type": "hobby"});
        let errors = check_fields(&EXPERIENCES, candidate.as_object().unwrap()).unwrap_err();
        assert_eq!(codes(&errors, "type"), vec!["invalid_choice"]);
    }

    #[test]
    fn null_for_defaulted_column_is_accepted() {
        let candidate = json!({"title": "a", "subtitle": "b", "type": "work", "order": null});
        let accepted = check_fields(&EXPERIENCES, candidate.as_object().unwrap()).unwrap();
        assert_eq!(accepted.get("order"), Some(&Value::Null));
    }

    #[test]
    fn timestamps_accept_rfc3339_and_naive_forms() {
        assert!(is_timestamp("2024-05-01T10:00:00Z"));
        assert!(is_timestamp("2024-05-01T10:00:00.123"));
        assert!(!is_timestamp("yesterday"));
    }
}
