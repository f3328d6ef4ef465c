use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub image: String,
}
