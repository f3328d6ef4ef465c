pub mod auth;
pub mod server;

pub use server::{HttpServer, HttpServerConfig};
