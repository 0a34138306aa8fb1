//! SQLite implementations of the storefront collaborators.
//!
//! [`Database`] is both the [`AuthProvider`] and the [`OrderBackend`]. Inputs
//! are validated with `khatti_core::validation` before touching the database,
//! and every failure leaves here as a [`CollaboratorError`] whose message is
//! fit for a toast.

use tracing::{debug, info, warn};

use crate::auth::{hash_password, verify_password};
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use khatti_core::validation::{validate_email, validate_full_name, validate_password};
use khatti_core::{
    AuthProvider, CollaboratorError, CollaboratorResult, NewOrder, NewOrderItem, Order,
    OrderBackend, OrderItem, UserAccount,
};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const ALREADY_REGISTERED: &str = "User already registered";

fn rejected(err: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::rejected(err.to_string())
}

// =============================================================================
// Auth
// =============================================================================

impl AuthProvider for Database {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> CollaboratorResult<UserAccount> {
        let email = validate_email(email).map_err(rejected)?;
        validate_password(password).map_err(rejected)?;
        let full_name = validate_full_name(full_name).map_err(rejected)?;

        let hash = hash_password(password)?;
        let record = self
            .users()
            .insert(&email, &full_name, &hash)
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => DbError::auth(ALREADY_REGISTERED),
                other => other,
            })?;

        info!(user_id = %record.id, "Account created");
        Ok(record.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> CollaboratorResult<UserAccount> {
        let email =
            validate_email(email).map_err(|_| CollaboratorError::rejected(INVALID_CREDENTIALS))?;

        let record = match self.users().find_by_email(&email).await? {
            Some(record) if verify_password(password, &record.password_hash) => record,
            _ => {
                debug!(email = %email, "Sign-in rejected");
                return Err(CollaboratorError::rejected(INVALID_CREDENTIALS));
            }
        };

        info!(user_id = %record.id, "Signed in");
        Ok(record.into())
    }

    async fn request_password_reset(&self, email: &str) -> CollaboratorResult<()> {
        let email = validate_email(email).map_err(rejected)?;
        self.issue_password_reset(&email).await?;
        Ok(())
    }
}

impl Database {
    /// Issues a reset token for the account with this email.
    ///
    /// Returns `None` for an unknown email; callers must not tell the
    /// difference apart to the shopper. The token is "mailed" by logging it.
    pub async fn issue_password_reset(&self, email: &str) -> DbResult<Option<String>> {
        let Some(user) = self.users().find_by_email(email).await? else {
            debug!(email = %email, "Password reset requested for unknown email");
            return Ok(None);
        };

        let (token, claims) = self.reset_tokens().issue(&user.id)?;
        self.password_resets()
            .record(&claims.jti, &user.id, claims.expires_at())
            .await?;

        info!(
            user_id = %user.id,
            email = %user.email,
            expires_at = %claims.expires_at(),
            token = %token,
            "Password reset link issued"
        );

        Ok(Some(token))
    }

    /// Sets a new password using a reset token. Each token works once.
    pub async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> CollaboratorResult<()> {
        validate_password(new_password).map_err(rejected)?;

        let claims = self.reset_tokens().validate(token)?;
        let hash = hash_password(new_password)?;
        self.password_resets()
            .consume(&claims.jti, &claims.sub, &hash)
            .await?;

        info!(user_id = %claims.sub, "Password reset completed");
        Ok(())
    }
}

// =============================================================================
// Orders
// =============================================================================

impl OrderBackend for Database {
    async fn create_order(&self, order: NewOrder) -> CollaboratorResult<Order> {
        let created = self.orders().create(&order).await.map_err(|e| {
            warn!(user_id = %order.user_id, error = %e, "Order insert failed");
            e
        })?;
        Ok(created)
    }

    async fn attach_items(
        &self,
        order_id: &str,
        items: Vec<NewOrderItem>,
    ) -> CollaboratorResult<Vec<OrderItem>> {
        let err = match self.orders().insert_items(order_id, items).await {
            Ok(stored) => return Ok(stored),
            Err(err) => err,
        };
        warn!(order_id = %order_id, error = %err, "Order items insert failed");

        // An order without items must not reach the history
        if let Err(cleanup) = self.orders().delete_if_empty(order_id).await {
            warn!(order_id = %order_id, error = %cleanup, "Could not remove empty order");
        }
        Err(err.into())
    }

    async fn orders_for_user(&self, user_id: &str) -> CollaboratorResult<Vec<Order>> {
        Ok(self.orders().list_for_user(user_id).await?)
    }

    async fn items_for_orders(&self, order_ids: &[String]) -> CollaboratorResult<Vec<OrderItem>> {
        Ok(self.orders().items_for_orders(order_ids).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use khatti_core::orders::{attach_items, build_order};
    use khatti_core::{Catalog, PricingRules, Store};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let db = db().await;
        let account = db
            .sign_up("  Asha@Example.com ", "khatti123", "Asha Rao")
            .await
            .unwrap();
        assert_eq!(account.email, "asha@example.com");

        let signed_in = db.sign_in("asha@example.com", "khatti123").await.unwrap();
        assert_eq!(signed_in.id, account.id);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let db = db().await;
        db.sign_up("asha@example.com", "khatti123", "Asha").await.unwrap();

        let err = db
            .sign_up("ASHA@example.com", "other-pass", "Asha")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let db = db().await;
        assert!(db.sign_up("not-an-email", "khatti123", "Asha").await.is_err());
        assert!(db.sign_up("asha@example.com", "123", "Asha").await.is_err());
        assert!(db.sign_up("asha@example.com", "khatti123", "   ").await.is_err());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let db = db().await;
        db.sign_up("asha@example.com", "khatti123", "Asha").await.unwrap();

        let err = db.sign_in("asha@example.com", "wrong-pass").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");

        let err = db.sign_in("nobody@example.com", "khatti123").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_reset_unknown_email_is_silent() {
        let db = db().await;
        db.request_password_reset("nobody@example.com").await.unwrap();
        assert!(db.issue_password_reset("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_flow_single_use() {
        let db = db().await;
        db.sign_up("asha@example.com", "khatti123", "Asha").await.unwrap();

        let token = db
            .issue_password_reset("asha@example.com")
            .await
            .unwrap()
            .unwrap();
        db.complete_password_reset(&token, "fresh-pass").await.unwrap();

        assert!(db.sign_in("asha@example.com", "khatti123").await.is_err());
        assert!(db.sign_in("asha@example.com", "fresh-pass").await.is_ok());

        let err = db
            .complete_password_reset(&token, "another-pass")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Reset link is invalid or has expired");
    }

    #[tokio::test]
    async fn test_reset_rejects_garbage_token() {
        let db = db().await;
        assert!(db.complete_password_reset("garbage", "fresh-pass").await.is_err());
    }

    #[tokio::test]
    async fn test_order_backend_round_trip() {
        let db = db().await;
        let user = db.sign_up("asha@example.com", "khatti123", "Asha").await.unwrap();

        let catalog = Catalog::builtin().unwrap();
        let tee = catalog.find("1").unwrap();
        let mut store = Store::default();
        store.add_to_cart(tee, "M", "Black");
        store.add_to_cart(tee, "M", "Black");

        let rules = PricingRules::default();
        let summary = rules.summarize(store.cart_total(), None);
        let (new_order, items) = build_order(&user.id, store.cart(), &summary).unwrap();

        let order = db.create_order(new_order).await.unwrap();
        db.attach_items(&order.id, items).await.unwrap();

        let orders = db.orders_for_user(&user.id).await.unwrap();
        let ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let items = db.items_for_orders(&ids).await.unwrap();
        let history = attach_items(orders, items);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order.total_amount, summary.total);
        assert_eq!(history[0].items.len(), 1);
        assert_eq!(history[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_failed_attach_removes_order() {
        let db = db().await;
        let user = db.sign_up("ravi@example.com", "khatti123", "Ravi").await.unwrap();
        let catalog = Catalog::builtin().unwrap();

        let mut store = Store::default();
        store.add_to_cart(catalog.find("2").unwrap(), "M", "Cream");
        let summary = PricingRules::default().summarize(store.cart_total(), None);
        let (new_order, mut items) = build_order(&user.id, store.cart(), &summary).unwrap();
        items[0].quantity = 0;

        let order = db.create_order(new_order).await.unwrap();
        assert!(db.attach_items(&order.id, items).await.is_err());
        assert!(db.orders_for_user(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_unknown_user_is_rejected_quietly() {
        let db = db().await;
        let order = NewOrder {
            user_id: "ghost".to_string(),
            total_amount: khatti_core::Money::from_rupees(100),
            shipping_amount: khatti_core::Money::zero(),
            tax_amount: khatti_core::Money::zero(),
            discount_amount: khatti_core::Money::zero(),
            payment_status: khatti_core::PaymentStatus::Paid,
            order_status: khatti_core::OrderStatus::Pending,
            shipping_address: None,
            coupon_code: None,
        };
        let err = db.create_order(order).await.unwrap_err();
        assert_eq!(err, CollaboratorError::unavailable("Something went wrong"));
    }
}
