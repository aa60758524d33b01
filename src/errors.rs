//! # Query Errors
//!
//! Every failure in this crate is a rejection of one client request: an
//! unknown field, an operator that does not apply to the field's type, or a
//! value that cannot be read as the field's type. All of them name the
//! offending field so the message can be shown to the end user as-is.
//!
//! The whole filter set is rejected on the first failing clause; nothing is
//! partially applied.
//!
//! ## HTTP
//!
//! [`QueryError`] implements [`IntoResponse`], producing `422 Unprocessable
//! Entity` with a small JSON body:
//!
//! ```json
//! { "error": "Operation STARTSWITH is not supported for NUMBER field 'age'", "field": "age" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::operation::Operation;
use crate::schema::FieldType;

/// A raw string that could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {expected} value")]
pub struct CoercionError {
    pub value: String,
    pub expected: FieldType,
}

/// Rejection of a filter or sort request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Field name not declared in the entity schema
    #[error("Unknown field '{field}' for {entity}")]
    UnknownField { entity: String, field: String },

    /// Operator not meaningful for the field's type
    #[error("Operation {operation} is not supported for {field_type} field '{field}'")]
    UnsupportedOperation {
        field: String,
        operation: Operation,
        field_type: FieldType,
    },

    /// Value could not be coerced to the field's type
    #[error("Invalid value '{value}' for {expected} field '{field}'")]
    InvalidValue {
        field: String,
        value: String,
        expected: FieldType,
    },
}

impl QueryError {
    pub(crate) fn invalid_value(field: &str, err: CoercionError) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: err.value,
            expected: err.expected,
        }
    }

    /// Name of the field the error refers to
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field, .. }
            | Self::UnsupportedOperation { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    field: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        tracing::debug!(
            error = %self,
            field = %self.field(),
            "Rejected page query"
        );

        let body = ErrorResponse {
            error: self.to_string(),
            field: self.field().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
