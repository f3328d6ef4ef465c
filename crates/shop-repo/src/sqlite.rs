use async_trait::async_trait;
use shop_types::domain::item::{Item, NewItem};
use shop_types::domain::order::{NewOrder, Order, OrderDetail};
use shop_types::domain::user::{NewUser, User, UserUpdate, UserWithOrders};
use shop_types::ports::shop_repository::{RepoError, ShopRepository};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbUser {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[derive(FromRow)]
struct DbItem {
    id: i64,
    title: String,
    image: String,
}

impl From<DbItem> for Item {
    fn from(row: DbItem) -> Self {
        Item {
            id: row.id,
            title: row.title,
            image: row.image,
        }
    }
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    quantity: i64,
    user_id: i64,
    item_id: i64,
}

impl From<DbOrder> for Order {
    fn from(row: DbOrder) -> Self {
        Order {
            id: row.id,
            quantity: row.quantity,
            user_id: row.user_id,
            item_id: row.item_id,
        }
    }
}

// Row shape of the orders-joined-with-items query.
#[derive(FromRow)]
struct DbOrderDetail {
    id: i64,
    quantity: i64,
    user_id: i64,
    item_id: i64,
    title: String,
    image: String,
}

impl From<DbOrderDetail> for OrderDetail {
    fn from(row: DbOrderDetail) -> Self {
        OrderDetail {
            id: row.id,
            quantity: row.quantity,
            user_id: row.user_id,
            item: Item {
                id: row.item_id,
                title: row.title,
                image: row.image,
            },
        }
    }
}

const ORDER_DETAIL_SQL: &str = "SELECT o.id, o.quantity, o.user_id, o.item_id, i.title, i.image
     FROM orders o JOIN items i ON i.id = o.item_id";

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file, one statement at a time.
        let ddl = include_str!("../migrations/0001_create_shop.sql");
        for stmt in ddl.split(';') {
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&pool).await?;
            }
        }

        Ok(Self { pool })
    }

    async fn orders_of(&self, user_id: i64) -> Result<Vec<OrderDetail>, RepoError> {
        let rows: Vec<DbOrderDetail> =
            sqlx::query_as(&format!("{} WHERE o.user_id = ? ORDER BY o.id", ORDER_DETAIL_SQL))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(OrderDetail::from).collect())
    }
}

#[async_trait]
impl ShopRepository for SqliteRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let res = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(User {
            id: res.last_insert_rowid(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        })
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> =
            sqlx::query_as("SELECT id, name, email, password_hash FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> =
            sqlx::query_as("SELECT id, name, email, password_hash FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(row.map(User::from))
    }

    async fn user_with_orders(&self, id: i64) -> Result<Option<UserWithOrders>, RepoError> {
        let Some(user) = self.find_user(id).await? else {
            return Ok(None);
        };
        let orders = self.orders_of(id).await?;
        Ok(Some(UserWithOrders::new(user, orders)))
    }

    async fn list_users(&self) -> Result<Vec<UserWithOrders>, RepoError> {
        let rows: Vec<DbUser> =
            sqlx::query_as("SELECT id, name, email, password_hash FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;

        let details: Vec<DbOrderDetail> =
            sqlx::query_as(&format!("{} ORDER BY o.id", ORDER_DETAIL_SQL))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;

        let mut users: Vec<UserWithOrders> = rows
            .into_iter()
            .map(|r| UserWithOrders::new(User::from(r), Vec::new()))
            .collect();
        for detail in details {
            let detail = OrderDetail::from(detail);
            if let Some(user) = users.iter_mut().find(|u| u.id == detail.user_id) {
                user.orders.push(detail);
            }
        }
        Ok(users)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, RepoError> {
        let res = sqlx::query("UPDATE users SET name = ?, email = ?, password_hash = ? WHERE id = ?")
            .bind(&update.name)
            .bind(&update.email)
            .bind(&update.password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_user(id).await
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, RepoError> {
        let res = sqlx::query("INSERT INTO items (title, image) VALUES (?, ?)")
            .bind(&item.title)
            .bind(&item.image)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(Item {
            id: res.last_insert_rowid(),
            title: item.title,
            image: item.image,
        })
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>, RepoError> {
        let row: Option<DbItem> =
            sqlx::query_as("SELECT id, title, image FROM items WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(row.map(Item::from))
    }

    async fn find_item_by_title(&self, title: &str) -> Result<Option<Item>, RepoError> {
        let row: Option<DbItem> =
            sqlx::query_as("SELECT id, title, image FROM items WHERE title = ?")
                .bind(title)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(row.map(Item::from))
    }

    async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
        let rows: Vec<DbItem> = sqlx::query_as("SELECT id, title, image FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        let res = sqlx::query("INSERT INTO orders (quantity, user_id, item_id) VALUES (?, ?, ?)")
            .bind(order.quantity)
            .bind(order.user_id)
            .bind(order.item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(Order {
            id: res.last_insert_rowid(),
            quantity: order.quantity,
            user_id: order.user_id,
            item_id: order.item_id,
        })
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> =
            sqlx::query_as("SELECT id, quantity, user_id, item_id FROM orders WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(row.map(Order::from))
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(res.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
