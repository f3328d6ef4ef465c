use serde::Serialize;
use shop_types::domain::item::{Item, NewItem};
use shop_types::domain::order::{NewOrder, Order};
use shop_types::domain::user::{UserUpdate, UserWithOrders};
use shop_types::ports::shop_repository::ShopRepository;

use crate::application::auth::{self, TokenSigner};
use crate::errors::AppError;

/// A signed-in user together with their freshly minted token, as returned by
/// sign-up and sign-in.
#[derive(Serialize)]
pub struct Session {
    pub user: UserWithOrders,
    pub token: String,
}

pub struct ShopService<R: ShopRepository> {
    repo: R,
    tokens: TokenSigner,
}

impl<R: ShopRepository> ShopService<R> {
    pub fn new(repo: R, tokens: TokenSigner) -> Self {
        Self { repo, tokens }
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        self.repo
            .list_items()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, AppError> {
        match self
            .repo
            .find_item(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(item) => Ok(item),
            None => Err(AppError::NotFound("Item not found".into())),
        }
    }

    pub async fn create_item(&self, title: String, image: String) -> Result<Item, AppError> {
        self.repo
            .create_item(NewItem { title, image })
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<UserWithOrders>, AppError> {
        self.repo
            .list_users()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub async fn get_user(&self, id: i64) -> Result<UserWithOrders, AppError> {
        match self
            .repo
            .user_with_orders(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(user) => Ok(user),
            None => Err(AppError::NotFound("User not found".into())),
        }
    }

    pub async fn sign_up(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<Session, AppError> {
        let password_hash = auth::hash_password(&password)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        // Store errors (e.g. a taken email) surface verbatim as 400s.
        let user = self
            .repo
            .create_user(shop_types::domain::user::NewUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        Ok(Session {
            user: UserWithOrders::from(user),
            token,
        })
    }

    pub async fn sign_in(&self, email: String, password: String) -> Result<Session, AppError> {
        let invalid = || AppError::BadRequest("User or password invalid".into());

        let user = self
            .repo
            .find_user_by_email(&email)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .ok_or_else(invalid)?;
        if !auth::verify_password(&password, &user.password_hash) {
            return Err(invalid());
        }

        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        let user = self
            .repo
            .user_with_orders(user.id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .ok_or_else(invalid)?;
        Ok(Session { user, token })
    }

    /// Resolve the caller from the raw `Authorization` header value. All
    /// failure modes (missing header, bad signature, vanished user) collapse
    /// into the same 400 response.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<UserWithOrders, AppError> {
        let invalid = || AppError::BadRequest("Invalid Token".into());

        let token = header.ok_or_else(invalid)?;
        let user_id = self.tokens.verify(token).map_err(|_| invalid())?;
        self.repo
            .user_with_orders(user_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .ok_or_else(invalid)
    }

    /// Update a user's profile. Only the owner may touch it; everyone else
    /// (and updates to absent users) get the same opaque 400.
    pub async fn update_profile(
        &self,
        caller_id: i64,
        target_id: i64,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserWithOrders, AppError> {
        let target = self
            .repo
            .find_user(target_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        match target {
            Some(target) if target.id == caller_id => {
                let password_hash = auth::hash_password(&password)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
                self.repo
                    .update_user(
                        target_id,
                        UserUpdate {
                            name,
                            email,
                            password_hash,
                        },
                    )
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                self.get_user(target_id).await
            }
            _ => Err(AppError::BadRequest("Not authorized".into())),
        }
    }

    /// Place an order for the calling user, connecting to the item by title.
    pub async fn place_order(
        &self,
        caller_id: i64,
        title: String,
        quantity: i64,
    ) -> Result<Order, AppError> {
        let item = self
            .repo
            .find_item_by_title(&title)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .ok_or_else(|| AppError::BadRequest(format!("No item with title {title}")))?;
        self.repo
            .create_order(NewOrder {
                quantity,
                user_id: caller_id,
                item_id: item.id,
            })
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }

    /// Delete an order, returning the deleted record. Only the owner may
    /// delete; mismatches and absent orders get the same opaque 400.
    pub async fn remove_order(&self, caller_id: i64, order_id: i64) -> Result<Order, AppError> {
        let order = self
            .repo
            .find_order(order_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        match order {
            Some(order) if order.user_id == caller_id => {
                self.repo
                    .delete_order(order_id)
                    .await
                    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
                Ok(order)
            }
            _ => Err(AppError::BadRequest("Not authorized to delete".into())),
        }
    }

    /// Release the underlying store connection.
    pub async fn close(&self) {
        self.repo.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ShopService<shop_repo::memory::InMemoryRepo> {
        ShopService::new(
            shop_repo::memory::InMemoryRepo::new(),
            TokenSigner::new("test-secret"),
        )
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_then_validate() {
        let svc = service();
        let signed_up = svc
            .sign_up("Alice".into(), "alice@example.com".into(), "hunter2".into())
            .await
            .unwrap();
        assert!(signed_up.user.orders.is_empty());

        let session = svc
            .sign_in("alice@example.com".into(), "hunter2".into())
            .await
            .unwrap();
        let resolved = svc.authenticate(Some(&session.token)).await.unwrap();
        assert_eq!(resolved.id, signed_up.user.id);
        assert_eq!(resolved.email, "alice@example.com");
    }

    #[tokio::test]
    async fn sign_in_rejects_wrong_password_and_unknown_email() {
        let svc = service();
        svc.sign_up("Alice".into(), "alice@example.com".into(), "hunter2".into())
            .await
            .unwrap();

        let wrong = svc
            .sign_in("alice@example.com".into(), "wrong".into())
            .await;
        assert!(matches!(wrong, Err(AppError::BadRequest(_))));

        let unknown = svc.sign_in("nobody@example.com".into(), "hunter2".into()).await;
        assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let svc = service();
        svc.sign_up("Alice".into(), "alice@example.com".into(), "pw".into())
            .await
            .unwrap();
        let dup = svc
            .sign_up("Alice2".into(), "alice@example.com".into(), "pw2".into())
            .await;
        assert!(matches!(dup, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn authenticate_rejects_missing_and_bad_tokens() {
        let svc = service();
        assert!(matches!(
            svc.authenticate(None).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            svc.authenticate(Some("garbage")).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn item_round_trip_and_not_found() {
        let svc = service();
        let created = svc.create_item("Mug".into(), "x.png".into()).await.unwrap();
        let fetched = svc.get_item(created.id).await.unwrap();
        assert_eq!(fetched.title, "Mug");
        assert_eq!(fetched.image, "x.png");

        let missing = svc.get_item(created.id + 1).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn orders_require_ownership_to_delete() {
        let svc = service();
        let alice = svc
            .sign_up("Alice".into(), "alice@example.com".into(), "pw".into())
            .await
            .unwrap();
        let bob = svc
            .sign_up("Bob".into(), "bob@example.com".into(), "pw".into())
            .await
            .unwrap();
        svc.create_item("Mug".into(), "x.png".into()).await.unwrap();

        let order = svc.place_order(alice.user.id, "Mug".into(), 2).await.unwrap();

        let denied = svc.remove_order(bob.user.id, order.id).await;
        assert!(matches!(denied, Err(AppError::BadRequest(_))));

        // The order survives the denied attempt.
        let alice_view = svc.get_user(alice.user.id).await.unwrap();
        assert_eq!(alice_view.orders.len(), 1);

        let removed = svc.remove_order(alice.user.id, order.id).await.unwrap();
        assert_eq!(removed.id, order.id);
        let alice_view = svc.get_user(alice.user.id).await.unwrap();
        assert!(alice_view.orders.is_empty());
    }

    #[tokio::test]
    async fn place_order_rejects_unknown_title() {
        let svc = service();
        let alice = svc
            .sign_up("Alice".into(), "alice@example.com".into(), "pw".into())
            .await
            .unwrap();
        let res = svc.place_order(alice.user.id, "Nope".into(), 1).await;
        assert!(matches!(res, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn profile_update_requires_ownership() {
        let svc = service();
        let alice = svc
            .sign_up("Alice".into(), "alice@example.com".into(), "pw".into())
            .await
            .unwrap();
        let bob = svc
            .sign_up("Bob".into(), "bob@example.com".into(), "pw".into())
            .await
            .unwrap();

        let denied = svc
            .update_profile(
                bob.user.id,
                alice.user.id,
                "Mallory".into(),
                "mallory@example.com".into(),
                "pw".into(),
            )
            .await;
        assert!(matches!(denied, Err(AppError::BadRequest(_))));

        let updated = svc
            .update_profile(
                alice.user.id,
                alice.user.id,
                "Alicia".into(),
                "alicia@example.com".into(),
                "newpw".into(),
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alicia");

        // The new password is live immediately.
        let session = svc
            .sign_in("alicia@example.com".into(), "newpw".into())
            .await
            .unwrap();
        assert_eq!(session.user.id, alice.user.id);
    }
}
