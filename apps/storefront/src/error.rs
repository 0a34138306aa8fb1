//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Command Function  →  Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── CoreError::ProductNotFound ───────► NOT_FOUND               │
//! │         ├── CoreError::EmptyCart ─────────────► CART_ERROR              │
//! │         ├── ValidationError ──────────────────► VALIDATION_ERROR        │
//! │         ├── CollaboratorError::Rejected ──────► REJECTED                │
//! │         ├── CollaboratorError::Unavailable ───► SERVICE_UNAVAILABLE     │
//! │         └── no signed-in user ────────────────► UNAUTHENTICATED         │
//! │                                                                         │
//! │  Shell  →  error toast with `message`                                   │
//! │            (UNAUTHENTICATED is shown as an info toast)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use khatti_core::{CollaboratorError, CoreError, ValidationError};
use khatti_db::DbError;

/// Shown for any catalog lookup that misses.
pub const PRODUCT_NOT_FOUND: &str = "Product Not Found";

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product Not Found"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or order not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Action needs a signed-in shopper
    Unauthenticated,

    /// Cart cannot be checked out
    CartError,

    /// Auth or order collaborator refused the request
    Rejected,

    /// Auth or order collaborator failed
    ServiceUnavailable,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// The catalog has no product with this id.
    pub fn product_not_found(id: &str) -> Self {
        tracing::debug!(product_id = %id, "Product lookup missed");
        ApiError::new(ErrorCode::NotFound, PRODUCT_NOT_FOUND)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::product_not_found(&id),
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, "Your cart is empty"),
            CoreError::InvalidCatalog(reason) => {
                tracing::error!("Catalog error: {}", reason);
                ApiError::internal("Catalog unavailable")
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Collaborator messages are already fit for the shopper.
impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Rejected(message) => ApiError::new(ErrorCode::Rejected, message),
            CollaboratorError::Unavailable(message) => {
                ApiError::new(ErrorCode::ServiceUnavailable, message)
            }
        }
    }
}

/// Converts database errors to API errors via the collaborator mapping, so
/// internals are logged rather than shown.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        CollaboratorError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_not_found_message() {
        let err: ApiError = CoreError::ProductNotFound("99".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product Not Found");
    }

    #[test]
    fn test_collaborator_message_passes_through() {
        let err: ApiError = CollaboratorError::rejected("Invalid login credentials").into();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Invalid login credentials");
    }

    #[test]
    fn test_db_internals_hidden() {
        let err: ApiError = DbError::QueryFailed("no such table: orders".to_string()).into();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
        assert!(!err.message.contains("orders"));
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_string(&ApiError::validation("bad")).unwrap();
        assert_eq!(json, r#"{"code":"VALIDATION_ERROR","message":"bad"}"#);
    }
}
