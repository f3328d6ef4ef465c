use async_trait::async_trait;

use crate::domain::item::{Item, NewItem};
use crate::domain::order::{NewOrder, Order};
use crate::domain::user::{NewUser, User, UserUpdate, UserWithOrders};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
}

#[async_trait]
pub trait ShopRepository: Send + Sync + 'static {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn user_with_orders(&self, id: i64) -> Result<Option<UserWithOrders>, RepoError>;
    async fn list_users(&self) -> Result<Vec<UserWithOrders>, RepoError>;
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, RepoError>;

    async fn create_item(&self, item: NewItem) -> Result<Item, RepoError>;
    async fn find_item(&self, id: i64) -> Result<Option<Item>, RepoError>;
    async fn find_item_by_title(&self, title: &str) -> Result<Option<Item>, RepoError>;
    async fn list_items(&self) -> Result<Vec<Item>, RepoError>;

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError>;
    async fn find_order(&self, id: i64) -> Result<Option<Order>, RepoError>;
    async fn delete_order(&self, id: i64) -> Result<bool, RepoError>;

    /// Release the underlying store connection. No-op for adapters without one.
    async fn close(&self) {}
}
