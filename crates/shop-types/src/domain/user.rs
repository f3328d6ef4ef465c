use serde::{Deserialize, Serialize};

use crate::domain::order::OrderDetail;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    // Stored bcrypt hash; kept out of every serialized response.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A user as returned by the API: identity fields plus their orders, each
/// order carrying the item it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithOrders {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub orders: Vec<OrderDetail>,
}

impl UserWithOrders {
    pub fn new(user: User, orders: Vec<OrderDetail>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            orders,
        }
    }
}

impl From<User> for UserWithOrders {
    fn from(user: User) -> Self {
        Self::new(user, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serialized() {
        let user = User {
            id: 1,
            name: "Alice".into(),
            email: "a@b.com".into(),
            password_hash: "$2b$08$secret".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn fresh_user_view_has_no_orders() {
        let user = User {
            id: 7,
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password_hash: String::new(),
        };
        let view = UserWithOrders::from(user);
        assert_eq!(view.id, 7);
        assert!(view.orders.is_empty());
    }
}
