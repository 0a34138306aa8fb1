//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell / web form                                              │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront command (Rust)                                     │
//! │  └── THIS MODULE: email, password, coupon, search, id checks            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── UNIQUE (users.email)                                               │
//! │  └── Foreign keys (order_items → orders → users)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart quantities are deliberately NOT validated here: the store treats
//! a quantity below one as a silent no-op rather than an error.
//!
//! ## Usage
//! ```rust
//! use khatti_core::validation::{validate_email, validate_password};
//!
//! assert_eq!(validate_email("  Asha@Example.com ").unwrap(), "asha@example.com");
//! assert!(validate_password("secret").is_ok());
//! assert!(validate_password("12345").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at sign-up and reset.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum length of a navbar search query.
pub const MAX_SEARCH_LENGTH: usize = 100;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates and normalizes an email address.
///
/// ## Rules
/// - Must not be empty
/// - At most 254 characters
/// - Exactly one `@` with a non-empty local part and a dotted domain
///
/// ## Returns
/// The trimmed, lower-cased address (the form accounts are stored under).
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(email.to_lowercase())
}

/// Validates a password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LENGTH`] characters (counted as chars, not bytes)
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Validates the full name entered at sign-up.
///
/// ## Returns
/// The trimmed name.
pub fn validate_full_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "full name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "full name".to_string(),
            max: 100,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Storefront Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum [`MAX_SEARCH_LENGTH`] characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(query.to_string())
}

/// Validates and normalizes a coupon code.
///
/// ## Returns
/// The trimmed, upper-cased code. Whether the code is actually offered is
/// decided by the pricing rules, not here.
///
/// ## Example
/// ```rust
/// use khatti_core::validation::validate_coupon_code;
///
/// assert_eq!(validate_coupon_code(" khatti10 ").unwrap(), "KHATTI10");
/// assert!(validate_coupon_code("  ").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.len() > 32 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "must be up to 32 letters and digits".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Validates a price filter range (inclusive, in rupees).
pub fn validate_price_range(min: i64, max: i64) -> ValidationResult<()> {
    if min < 0 || max < min {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: crate::MAX_PRICE_FILTER,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("asha@example.com").unwrap(), "asha@example.com");
        assert_eq!(validate_email(" Ravi@Khatti.IN ").unwrap(), "ravi@khatti.in");

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_full_name() {
        assert_eq!(validate_full_name("  Asha Rao ").unwrap(), "Asha Rao");
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  hoodie ").unwrap(), "hoodie");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert_eq!(validate_coupon_code("khatti10").unwrap(), "KHATTI10");
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("BAD-CODE").is_err());
    }

    #[test]
    fn test_validate_price_range() {
        assert!(validate_price_range(0, 20_000).is_ok());
        assert!(validate_price_range(500, 500).is_ok());
        assert!(validate_price_range(-1, 100).is_err());
        assert!(validate_price_range(600, 500).is_err());
    }
}
