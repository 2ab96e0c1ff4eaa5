use std::borrow::Cow;
use std::fmt;

use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    ConstraintViolation(ConstraintViolation),
    NotFound(String),
    StoreUnavailable(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::ConstraintViolation(v) => write!(f, "Constraint violation: {}", v),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn unique(table: &str, detail: impl Into<String>) -> Self {
        AppError::ConstraintViolation(ConstraintViolation {
            kind: ConstraintKind::Unique,
            table: table.to_string(),
            detail: detail.into(),
        })
    }

    pub fn foreign_key(table: &str, detail: impl Into<String>) -> Self {
        AppError::ConstraintViolation(ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            table: table.to_string(),
            detail: detail.into(),
        })
    }

    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            AppError::ConstraintViolation(v) => Some(v.kind),
            _ => None,
        }
    }

    /// Field names carried by a validation error, in report order.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            AppError::ValidationError(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        field_errors.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::unique(
                    e.table().unwrap_or("unknown"),
                    e.constraint().unwrap_or("unique constraint").to_string(),
                )
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23503")) => {
                AppError::foreign_key(
                    e.table().unwrap_or("unknown"),
                    e.constraint().unwrap_or("foreign key constraint").to_string(),
                )
            }
            sqlx::Error::RowNotFound => AppError::NotFound("Database row not found".into()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::StoreUnavailable(err.to_string()),
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ConstraintKind {
    #[display("unique")]
    Unique,

    #[display("foreign key")]
    ForeignKey,
}

#[derive(Debug, Clone, Display, Serialize)]
#[display("{kind} constraint on {table}: {detail}")]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub table: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}
