use anyhow::Context;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    pub token_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "4000".into());
        let database_url = env::var("DATABASE_URL").ok();
        let token_secret = env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set")?;
        Ok(Self {
            server_port,
            database_url,
            token_secret,
        })
    }
}
