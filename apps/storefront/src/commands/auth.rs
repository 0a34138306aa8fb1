//! # Auth Commands
//!
//! Sign-up, sign-in, sign-out and password reset.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Auth page mode        Command                   Toast on success       │
//! │  ──────────────        ───────                   ────────────────       │
//! │  register ───────────► sign_up ────────────────► "Account created!"     │
//! │  login ──────────────► sign_in ────────────────► "Welcome back!"        │
//! │  forgot ─────────────► reset_password ─────────► "Password reset email  │
//! │                                                    sent!"               │
//! │  reset link ─────────► complete_password_reset ► "Password updated"     │
//! │  navbar ─────────────► sign_out                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The auth collaborator checks credentials; the session state remembers
//! who is signed in.

use serde::Deserialize;
use tracing::{debug, info};

use khatti_core::{AuthProvider, UserAccount};
use khatti_db::Database;

use crate::error::ApiError;
use crate::state::{SessionState, Toast, ToastState};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Creates an account and signs it in.
pub async fn sign_up(
    auth: &impl AuthProvider,
    session: &SessionState,
    toasts: &ToastState,
    request: SignUpRequest,
) -> Result<UserAccount, ApiError> {
    debug!(email = %request.email, "sign_up command");

    let account = auth
        .sign_up(&request.email, &request.password, &request.full_name)
        .await?;

    session.sign_in(account.clone());
    toasts.push(Toast::success("Account created!"));

    Ok(account)
}

pub async fn sign_in(
    auth: &impl AuthProvider,
    session: &SessionState,
    toasts: &ToastState,
    email: &str,
    password: &str,
) -> Result<UserAccount, ApiError> {
    debug!(email = %email, "sign_in command");

    let account = auth.sign_in(email, password).await?;

    session.sign_in(account.clone());
    toasts.push(Toast::success("Welcome back!"));

    Ok(account)
}

/// Forgets the signed-in shopper. The cart and wishlist stay.
pub fn sign_out(session: &SessionState) -> Option<UserAccount> {
    let previous = session.sign_out();
    if let Some(account) = &previous {
        info!(user_id = %account.id, "Signed out");
    }
    previous
}

/// Sends a reset link. Says the same thing whether or not the email has an
/// account.
pub async fn reset_password(
    auth: &impl AuthProvider,
    toasts: &ToastState,
    email: &str,
) -> Result<(), ApiError> {
    debug!(email = %email, "reset_password command");

    auth.request_password_reset(email).await?;
    toasts.push(Toast::success("Password reset email sent!"));

    Ok(())
}

/// Sets a new password from a reset link's token.
pub async fn complete_password_reset(
    db: &Database,
    toasts: &ToastState,
    token: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    debug!("complete_password_reset command");

    db.complete_password_reset(token, new_password).await?;
    toasts.push(Toast::success("Password updated. Please sign in."));

    Ok(())
}

pub fn current_user(session: &SessionState) -> Option<UserAccount> {
    session.current()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use khatti_db::DbConfig;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn request(email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "khatti123".to_string(),
            full_name: "Zoya Khan".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let db = db().await;
        let session = SessionState::new();
        let toasts = ToastState::new();

        let account = sign_up(&db, &session, &toasts, request("zoya@example.com")).await.unwrap();
        assert_eq!(current_user(&session), Some(account));
        assert_eq!(toasts.drain(), vec![Toast::success("Account created!")]);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_surfaces_message() {
        let db = db().await;
        let session = SessionState::new();
        let toasts = ToastState::new();
        sign_up(&db, &session, &toasts, request("zoya@example.com")).await.unwrap();
        sign_out(&session);

        let err = sign_up(&db, &session, &toasts, request("zoya@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "User already registered");
        assert!(current_user(&session).is_none());
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let db = db().await;
        let session = SessionState::new();
        let toasts = ToastState::new();
        sign_up(&db, &session, &toasts, request("zoya@example.com")).await.unwrap();
        assert!(sign_out(&session).is_some());

        let err = sign_in(&db, &session, &toasts, "zoya@example.com", "nope-nope")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid login credentials");
        assert!(current_user(&session).is_none());

        toasts.drain();
        sign_in(&db, &session, &toasts, "zoya@example.com", "khatti123").await.unwrap();
        assert!(current_user(&session).is_some());
        assert_eq!(toasts.drain(), vec![Toast::success("Welcome back!")]);
    }

    #[tokio::test]
    async fn test_reset_password_flow() {
        let db = db().await;
        let session = SessionState::new();
        let toasts = ToastState::new();
        sign_up(&db, &session, &toasts, request("zoya@example.com")).await.unwrap();
        sign_out(&session);

        reset_password(&db, &toasts, "unknown@example.com").await.unwrap();
        reset_password(&db, &toasts, "zoya@example.com").await.unwrap();

        let token = db
            .issue_password_reset("zoya@example.com")
            .await
            .unwrap()
            .unwrap();
        complete_password_reset(&db, &toasts, &token, "new-secret").await.unwrap();
        assert!(complete_password_reset(&db, &toasts, &token, "again-secret").await.is_err());

        sign_in(&db, &session, &toasts, "zoya@example.com", "new-secret").await.unwrap();
    }
}
