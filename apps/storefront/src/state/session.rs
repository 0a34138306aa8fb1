//! # Session State
//!
//! Who is signed in. The auth collaborator verifies credentials; holding the
//! resulting identity (and forgetting it on sign-out) is the app's job.

use std::sync::{Arc, PoisonError, RwLock};

use khatti_core::UserAccount;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    user: Arc<RwLock<Option<UserAccount>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in account, if any.
    pub fn current(&self) -> Option<UserAccount> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the signed-in account.
    pub fn sign_in(&self, account: UserAccount) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(account);
    }

    /// Forgets the signed-in account and returns it.
    pub fn sign_out(&self) -> Option<UserAccount> {
        self.user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// The signed-in account, or an `UNAUTHENTICATED` error carrying
    /// `message`.
    pub fn require_user(&self, message: &str) -> Result<UserAccount, ApiError> {
        self.current()
            .ok_or_else(|| ApiError::unauthenticated(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account() -> UserAccount {
        UserAccount {
            id: "u-1".to_string(),
            email: "asha@example.com".to_string(),
            full_name: "Asha".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionState::new();
        assert!(session.require_user("Please sign in").is_err());

        session.sign_in(account());
        assert_eq!(session.require_user("x").unwrap().id, "u-1");

        assert_eq!(session.sign_out().map(|a| a.id), Some("u-1".to_string()));
        assert!(session.current().is_none());
        assert!(session.sign_out().is_none());
    }
}
