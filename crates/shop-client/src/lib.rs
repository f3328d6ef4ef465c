use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use shop_types::domain::item::Item;
use shop_types::domain::order::Order;
use shop_types::domain::user::UserWithOrders;

#[derive(Clone)]
pub struct ShopClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct ShopClient {
    base: Url,
    client: reqwest::Client,
}

impl ShopClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<ShopClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(ShopClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn sign_up(&self, req: SignUpRequest) -> anyhow::Result<Session> {
        let res = self
            .client
            .post(self.url("sign-up")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn sign_in(&self, req: SignInRequest) -> anyhow::Result<Session> {
        let res = self
            .client
            .post(self.url("sign-in")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    /// Resolve the user behind a token. The token rides as the entire
    /// `Authorization` value.
    pub async fn validate(&self, token: &str) -> anyhow::Result<UserWithOrders> {
        let res = self
            .client
            .get(self.url("validate")?)
            .header("authorization", token)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_items(&self) -> anyhow::Result<Vec<Item>> {
        let res = self
            .client
            .get(self.url("items")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_item(&self, id: i64) -> anyhow::Result<Item> {
        let res = self
            .client
            .get(self.url(&format!("items/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_item(&self, req: CreateItemRequest) -> anyhow::Result<Item> {
        let res = self
            .client
            .post(self.url("items")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<UserWithOrders>> {
        let res = self
            .client
            .get(self.url("users")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_user(&self, id: i64) -> anyhow::Result<UserWithOrders> {
        let res = self
            .client
            .get(self.url(&format!("users/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn update_user(
        &self,
        id: i64,
        token: &str,
        req: UpdateUserRequest,
    ) -> anyhow::Result<UserWithOrders> {
        let res = self
            .client
            .patch(self.url(&format!("users/{id}"))?)
            .header("authorization", token)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_order(&self, token: &str, req: CreateOrderRequest) -> anyhow::Result<Order> {
        let res = self
            .client
            .post(self.url("orders")?)
            .header("authorization", token)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_order(&self, token: &str, id: i64) -> anyhow::Result<Order> {
        let res = self
            .client
            .delete(self.url(&format!("orders/{id}"))?)
            .header("authorization", token)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

impl ShopClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Attach a session token to every request from the built client.
    pub fn with_token(self, token: &str) -> anyhow::Result<Self> {
        self.with_header("authorization", token)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<ShopClient> {
        if let Some(client) = self.client {
            return Ok(ShopClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(ShopClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateItemRequest {
    pub title: String,
    pub image: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateOrderRequest {
    pub quantity: i64,
    pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Session {
    pub user: UserWithOrders,
    pub token: String,
}
