pub mod auth;
pub mod shop_service;
