#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use shop_types::domain::item::{Item, NewItem};
use shop_types::domain::order::{NewOrder, Order};
use shop_types::domain::user::{NewUser, User, UserUpdate, UserWithOrders};
use shop_types::ports::shop_repository::{RepoError, ShopRepository};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub struct Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    memory: memory::InMemoryRepo,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteRepo,
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::InMemoryRepo::new(),
        })
    }

    #[cfg(feature = "sqlite")]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://shop.db");
        let sqlite = sqlite::SqliteRepo::new(url).await?;
        Ok(Self { sqlite })
    }
}

// With both features enabled the sqlite adapter is authoritative; the memory
// adapter stays available as a standalone type for tests.
#[cfg(feature = "sqlite")]
#[async_trait::async_trait]
impl ShopRepository for Repo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.sqlite.create_user(user).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        self.sqlite.find_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.sqlite.find_user_by_email(email).await
    }

    async fn user_with_orders(&self, id: i64) -> Result<Option<UserWithOrders>, RepoError> {
        self.sqlite.user_with_orders(id).await
    }

    async fn list_users(&self) -> Result<Vec<UserWithOrders>, RepoError> {
        self.sqlite.list_users().await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, RepoError> {
        self.sqlite.update_user(id, update).await
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, RepoError> {
        self.sqlite.create_item(item).await
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>, RepoError> {
        self.sqlite.find_item(id).await
    }

    async fn find_item_by_title(&self, title: &str) -> Result<Option<Item>, RepoError> {
        self.sqlite.find_item_by_title(title).await
    }

    async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
        self.sqlite.list_items().await
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        self.sqlite.create_order(order).await
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        self.sqlite.find_order(id).await
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        self.sqlite.delete_order(id).await
    }

    async fn close(&self) {
        self.sqlite.close().await
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl ShopRepository for Repo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.memory.create_user(user).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        self.memory.find_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.memory.find_user_by_email(email).await
    }

    async fn user_with_orders(&self, id: i64) -> Result<Option<UserWithOrders>, RepoError> {
        self.memory.user_with_orders(id).await
    }

    async fn list_users(&self) -> Result<Vec<UserWithOrders>, RepoError> {
        self.memory.list_users().await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, RepoError> {
        self.memory.update_user(id, update).await
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, RepoError> {
        self.memory.create_item(item).await
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>, RepoError> {
        self.memory.find_item(id).await
    }

    async fn find_item_by_title(&self, title: &str) -> Result<Option<Item>, RepoError> {
        self.memory.find_item_by_title(title).await
    }

    async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
        self.memory.list_items().await
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        self.memory.create_order(order).await
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        self.memory.find_order(id).await
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        self.memory.delete_order(id).await
    }

    async fn close(&self) {
        self.memory.close().await
    }
}
