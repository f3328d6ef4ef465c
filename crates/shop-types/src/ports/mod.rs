pub mod shop_repository;
