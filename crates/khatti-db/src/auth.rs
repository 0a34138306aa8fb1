//! Credential handling: argon2 password hashes and signed password reset
//! tokens.
//!
//! ## Reset Token Lifecycle
//! ```text
//! request_password_reset(email)
//!      │
//!      ▼
//! ResetTokens::issue(user_id) ──► JWT { sub, iat, exp, jti, token_type }
//!      │                          + password_resets row keyed by jti
//!      ▼
//! complete_password_reset(token, new_password)
//!      │
//!      ├── signature / expiry / token_type checked here
//!      └── jti consumed once in password_resets (used_at set)
//! ```

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

const RESET_TOKEN_TYPE: &str = "password_reset";

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage (argon2id, random salt, PHC string).
pub fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
///
/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Reset Tokens
// =============================================================================

/// Claims of a password reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    /// Subject (user id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID, the single-use key in `password_resets`
    pub jti: String,

    /// Always "password_reset"
    pub token_type: String,
}

impl ResetClaims {
    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Issues and validates HS256 password reset tokens.
#[derive(Clone)]
pub struct ResetTokens {
    secret: String,
    lifetime_secs: i64,
}

impl fmt::Debug for ResetTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetTokens")
            .field("secret", &"<redacted>")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

impl ResetTokens {
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        ResetTokens {
            secret,
            lifetime_secs,
        }
    }

    /// Signs a new token for the user.
    pub fn issue(&self, user_id: &str) -> DbResult<(String, ResetClaims)> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = ResetClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: RESET_TOKEN_TYPE.to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DbError::Internal(format!("Failed to generate reset token: {}", e)))?;

        Ok((token, claims))
    }

    /// Checks signature, expiry and token type.
    pub fn validate(&self, token: &str) -> DbResult<ResetClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data: TokenData<ResetClaims> = decode(
            token.trim(),
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Reset token rejected");
            DbError::auth("Reset link is invalid or has expired")
        })?;

        if token_data.claims.token_type != RESET_TOKEN_TYPE {
            return Err(DbError::auth("Reset link is invalid or has expired"));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("khatti123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("khatti123", &hash));
        assert!(!verify_password("khatti124", &hash));
        assert!(!verify_password("khatti123", "not-a-hash"));
    }

    #[test]
    fn test_reset_token_roundtrip() {
        let tokens = ResetTokens::new("test-secret".to_string(), 600);
        let (token, issued) = tokens.issue("user-1").unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.token_type, "password_reset");
    }

    #[test]
    fn test_reset_token_wrong_secret() {
        let (token, _) = ResetTokens::new("one".to_string(), 600)
            .issue("user-1")
            .unwrap();
        let result = ResetTokens::new("two".to_string(), 600).validate(&token);
        assert!(matches!(result, Err(DbError::AuthFailed(_))));
    }

    #[test]
    fn test_expired_reset_token() {
        let tokens = ResetTokens::new("test-secret".to_string(), -120);
        let (token, _) = tokens.issue("user-1").unwrap();
        assert!(tokens.validate(&token).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let tokens = ResetTokens::new("very-secret".to_string(), 600);
        assert!(!format!("{:?}", tokens).contains("very-secret"));
    }
}
