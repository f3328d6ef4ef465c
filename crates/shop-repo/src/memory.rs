use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use shop_types::domain::item::{Item, NewItem};
use shop_types::domain::order::{NewOrder, Order, OrderDetail};
use shop_types::domain::user::{NewUser, User, UserUpdate, UserWithOrders};
use shop_types::ports::shop_repository::{RepoError, ShopRepository};

#[derive(Clone)]
pub struct InMemoryRepo {
    users: Arc<DashMap<i64, User>>,
    items: Arc<DashMap<i64, Item>>,
    orders: Arc<DashMap<i64, Order>>,
    next_user_id: Arc<AtomicI64>,
    next_item_id: Arc<AtomicI64>,
    next_order_id: Arc<AtomicI64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            items: Arc::new(DashMap::new()),
            orders: Arc::new(DashMap::new()),
            next_user_id: Arc::new(AtomicI64::new(1)),
            next_item_id: Arc::new(AtomicI64::new(1)),
            next_order_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn orders_of(&self, user_id: i64) -> Result<Vec<OrderDetail>, RepoError> {
        let mut details = Vec::new();
        for order in self.orders.iter().filter(|o| o.user_id == user_id) {
            let item = self
                .items
                .get(&order.item_id)
                .map(|i| i.clone())
                .ok_or_else(|| {
                    RepoError::DbError(format!("order {} references missing item", order.id))
                })?;
            details.push(OrderDetail {
                id: order.id,
                quantity: order.quantity,
                user_id: order.user_id,
                item,
            });
        }
        details.sort_by_key(|d| d.id);
        Ok(details)
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShopRepository for InMemoryRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        if self.email_taken(&user.email, None) {
            return Err(RepoError::DbError(
                "UNIQUE constraint failed: users.email".into(),
            ));
        }
        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn user_with_orders(&self, id: i64) -> Result<Option<UserWithOrders>, RepoError> {
        let Some(user) = self.users.get(&id).map(|u| u.clone()) else {
            return Ok(None);
        };
        let orders = self.orders_of(id)?;
        Ok(Some(UserWithOrders::new(user, orders)))
    }

    async fn list_users(&self) -> Result<Vec<UserWithOrders>, RepoError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        users
            .into_iter()
            .map(|u| {
                let orders = self.orders_of(u.id)?;
                Ok(UserWithOrders::new(u, orders))
            })
            .collect()
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, RepoError> {
        if self.email_taken(&update.email, Some(id)) {
            return Err(RepoError::DbError(
                "UNIQUE constraint failed: users.email".into(),
            ));
        }
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        user.name = update.name;
        user.email = update.email;
        user.password_hash = update.password_hash;
        Ok(Some(user.clone()))
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, RepoError> {
        if self.items.iter().any(|i| i.title == item.title) {
            return Err(RepoError::DbError(
                "UNIQUE constraint failed: items.title".into(),
            ));
        }
        let id = self.next_item_id.fetch_add(1, Ordering::SeqCst);
        let item = Item {
            id,
            title: item.title,
            image: item.image,
        };
        self.items.insert(id, item.clone());
        Ok(item)
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>, RepoError> {
        Ok(self.items.get(&id).map(|i| i.clone()))
    }

    async fn find_item_by_title(&self, title: &str) -> Result<Option<Item>, RepoError> {
        Ok(self
            .items
            .iter()
            .find(|i| i.title == title)
            .map(|i| i.value().clone()))
    }

    async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
        let mut items: Vec<Item> = self.items.iter().map(|i| i.value().clone()).collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        if !self.users.contains_key(&order.user_id) {
            return Err(RepoError::DbError("FOREIGN KEY constraint failed".into()));
        }
        if !self.items.contains_key(&order.item_id) {
            return Err(RepoError::DbError("FOREIGN KEY constraint failed".into()));
        }
        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        let order = Order {
            id,
            quantity: order.quantity,
            user_id: order.user_id,
            item_id: order.item_id,
        };
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(&id).map(|o| o.clone()))
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.orders.remove(&id).is_some())
    }
}
