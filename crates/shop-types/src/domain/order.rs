use serde::{Deserialize, Serialize};

use crate::domain::item::Item;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub quantity: i64,
    pub user_id: i64,
    pub item_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub quantity: i64,
    pub user_id: i64,
    pub item_id: i64,
}

/// An order joined with the item it refers to, as embedded in user views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub quantity: i64,
    pub user_id: i64,
    pub item: Item,
}
