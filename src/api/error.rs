use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use validator::ValidationErrors;

use super::{ErrorBody, FieldErrorDto};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    /// Request could not be parsed (bad JSON, wrong types, malformed query).
    ValidationError(String),

    /// Request parsed but broke one or more field constraints.
    InvalidFields(ValidationErrors),

    Conflict(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InvalidFields(errors) => write!(f, "Validation error: {}", errors),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("A database error occurred"),
                )
            }
            ApiError::ValidationError(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorBody::new(msg))
            }
            ApiError::InvalidFields(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    detail: "Validation failed".to_string(),
                    errors: field_errors(&errors),
                },
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new(msg)),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::InvalidFields(errors)
    }
}

impl ApiError {
    pub fn movie_not_found() -> Self {
        ApiError::NotFound("Movie with the given ID was not found.".to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}

/// Flattens field errors into a list sorted by field name.
fn field_errors(errors: &ValidationErrors) -> Vec<FieldErrorDto> {
    let mut out: Vec<FieldErrorDto> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldErrorDto {
                field: field.clone(),
                code: err.code.to_string(),
                message: err.message.as_ref().map(ToString::to_string),
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out
}
