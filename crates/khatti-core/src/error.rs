//! # Error Types
//!
//! Domain-specific error types for khatti-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  khatti-core errors (this file)                                         │
//! │  ├── CoreError          - General domain errors                         │
//! │  ├── ValidationError    - Input validation failures                     │
//! │  └── CollaboratorError  - Auth / order backend failures                 │
//! │                                                                         │
//! │  khatti-db errors (separate crate)                                      │
//! │  └── DbError            - Database operation failures                   │
//! │                                                                         │
//! │  Storefront errors (in app)                                             │
//! │  └── ApiError           - What the shell shows as an error toast        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → toast                   │
//! │        DbError → CollaboratorError → ApiError → toast                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, coupon code, etc.)
//! 3. Errors are enum variants, never String
//! 4. Collaborator errors display as the message the shopper sees

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A catalog file could not be parsed.
    ///
    /// ## When This Occurs
    /// - `KHATTI_CATALOG_PATH` points at malformed JSON
    /// - A product is missing a required field
    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Coupon code is not offered.
    #[error("Invalid coupon code: {0}")]
    UnknownCoupon(String),

    /// Duplicate value (e.g., duplicate catalog id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Collaborator Error
// =============================================================================

/// Failure reported by the auth or order collaborator.
///
/// `Display` is exactly the message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// The collaborator refused the request (bad credentials, duplicate email).
    #[error("{0}")]
    Rejected(String),

    /// The collaborator could not be reached or failed internally.
    #[error("{0}")]
    Unavailable(String),
}

impl CollaboratorError {
    pub fn rejected(message: impl Into<String>) -> Self {
        CollaboratorError::Rejected(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        CollaboratorError::Unavailable(message.into())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("42".to_string());
        assert_eq!(err.to_string(), "Product not found: 42");
        assert_eq!(CoreError::EmptyCart.to_string(), "Your cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");

        let err = ValidationError::UnknownCoupon("SAVE50".to_string());
        assert_eq!(err.to_string(), "Invalid coupon code: SAVE50");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_collaborator_error_displays_message_only() {
        let err = CollaboratorError::rejected("Invalid login credentials");
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
