//! Error types for recipe operations.
//!
//! [`StoreError`] is what the storage layer reports. [`ApiError`] is the taxonomy the HTTP
//! handlers work with; every variant renders as the same `{success: false, error}` envelope
//! with status 400, distinguished only by its message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

/// Message returned when a path id is not an integer.
pub const INVALID_ID_MESSAGE: &str = "¡🚫 Error culinario! ¡El id debe ser un número! 🧐";
/// Message returned when a request body is missing a field or has an empty one.
pub const INVALID_DETAILS_MESSAGE: &str = "¡🚫 Error culinario! ¡Revisa los detalles! 🧐";
/// Message returned when no recipe has the requested id.
pub const NOT_FOUND_MESSAGE: &str = "¡🚫 Error culinario! ¡Este id no existe! 😥";
/// Message returned when a recipe with the same name already exists.
pub const CONFLICT_MESSAGE: &str = "¡🚫 Error culinario! ¡Esta receta ya existe! 🧐";
/// Message returned for any database or connection failure.
pub const RETRY_MESSAGE: &str = "¡Oops! 🙊 ¡Vuelve a intentarlo! 💪";

/// Errors that can occur during recipe storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No recipe matched the given id.
    #[error("recipe {0} not found")]
    NotFound(i64),
    /// A recipe with the same name already exists.
    #[error("a recipe named {0:?} already exists")]
    Conflict(String),
    /// A session could not be established or acquired.
    #[error("connection error: {0}")]
    Connection(String),
    /// The database rejected or failed a statement.
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => StoreError::Connection(e.to_string()),
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Which part of a request failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The path id did not parse as an integer.
    InvalidId(String),
    /// A required body field was missing or empty.
    MissingField(&'static str),
    /// A body field holds text the database cannot store.
    InvalidField(&'static str),
    /// The body was not a JSON object of the expected shape.
    MalformedBody(String),
    /// The query string did not deserialize.
    MalformedQuery(String),
}

/// Errors surfaced by the recipe HTTP handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request failed validation before touching the database.
    #[error("validation failed: {0:?}")]
    Validation(ValidationError),
    /// No recipe has the requested id. Holds the id as it appeared in the path.
    #[error("recipe {0} not found")]
    NotFound(String),
    /// The recipe name is already taken.
    #[error("recipe name already taken: {0}")]
    Conflict(String),
    /// The database could not be reached.
    #[error("connection error: {0}")]
    Connection(String),
    /// The database failed the statement.
    #[error("database error: {0}")]
    Database(String),
}

impl ApiError {
    /// The human-readable message placed in the error envelope.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Validation(ValidationError::InvalidId(_)) => INVALID_ID_MESSAGE,
            ApiError::Validation(_) => INVALID_DETAILS_MESSAGE,
            ApiError::NotFound(_) => NOT_FOUND_MESSAGE,
            ApiError::Conflict(_) => CONFLICT_MESSAGE,
            ApiError::Connection(_) | ApiError::Database(_) => RETRY_MESSAGE,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApiError::NotFound(id.to_string()),
            StoreError::Conflict(name) => ApiError::Conflict(name),
            StoreError::Connection(msg) => ApiError::Connection(msg),
            StoreError::Database(msg) => ApiError::Database(msg),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

/// The `{success: false, error}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Human-readable description of what went wrong.
    pub error: String,
}

impl ErrorResponse {
    /// Wraps a message in a failure envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Connection(_) | ApiError::Database(_) => {
                tracing::error!(error = %self, "recipe request failed");
            }
            _ => {
                tracing::warn!(error = %self, "recipe request rejected");
            }
        }
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_its_message() {
        assert_eq!(
            ApiError::Validation(ValidationError::InvalidId("abc".into())).message(),
            INVALID_ID_MESSAGE
        );
        assert_eq!(
            ApiError::Validation(ValidationError::MissingField("nombre")).message(),
            INVALID_DETAILS_MESSAGE
        );
        assert_eq!(
            ApiError::Validation(ValidationError::MalformedBody("eof".into())).message(),
            INVALID_DETAILS_MESSAGE
        );
        assert_eq!(
            ApiError::Validation(ValidationError::InvalidField("nombre")).message(),
            INVALID_DETAILS_MESSAGE
        );
        assert_eq!(
            ApiError::Validation(ValidationError::MalformedQuery("dup".into())).message(),
            INVALID_DETAILS_MESSAGE
        );
        assert_eq!(ApiError::NotFound("7".into()).message(), NOT_FOUND_MESSAGE);
        assert_eq!(
            ApiError::Conflict("Tortilla".into()).message(),
            CONFLICT_MESSAGE
        );
        assert_eq!(ApiError::Connection("down".into()).message(), RETRY_MESSAGE);
        assert_eq!(ApiError::Database("boom".into()).message(), RETRY_MESSAGE);
    }

    #[test]
    fn store_errors_keep_their_kind() {
        assert_eq!(ApiError::from(StoreError::NotFound(3)), ApiError::NotFound("3".into()));
        assert!(matches!(
            ApiError::from(StoreError::Conflict("x".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(StoreError::Connection("x".into())),
            ApiError::Connection(_)
        ));
    }

    #[test]
    fn pool_timeout_is_a_connection_error() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Connection(_)));
    }

    #[test]
    fn row_not_found_is_a_database_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[tokio::test]
    async fn errors_render_as_bad_request_envelope() {
        let response = ApiError::NotFound("1".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, ErrorResponse::new(NOT_FOUND_MESSAGE));
    }
}
