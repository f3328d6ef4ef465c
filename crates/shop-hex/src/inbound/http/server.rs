use axum::{
    extract::State,
    middleware,
    routing::{delete, get, patch, post},
    serve, Extension, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::shop_service::{Session, ShopService};
use crate::errors::AppError;
use crate::inbound::http::auth::{require_identity, Identity};
use shop_types::domain::item::Item;
use shop_types::domain::order::Order;
use shop_types::domain::user::UserWithOrders;
use shop_types::ports::shop_repository::ShopRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct HttpServer<R>
where
    R: ShopRepository,
{
    pub service: Arc<ShopService<R>>,
    pub config: HttpServerConfig,
}

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub image: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub quantity: i64,
    pub title: String,
}

impl<R> HttpServer<R>
where
    R: ShopRepository + Send + Sync + 'static,
{
    pub async fn new(service: ShopService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let svc = self.service.clone();
        let protected = Router::new()
            .route("/validate", get(validate::<R>))
            .route("/users/{id}", patch(update_user::<R>))
            .route("/orders", post(create_order::<R>))
            .route("/orders/{id}", delete(delete_order::<R>))
            .route_layer(middleware::from_fn_with_state(
                svc.clone(),
                require_identity::<R>,
            ));

        let app = Router::new()
            .route("/health", get(health))
            .route("/items", get(list_items::<R>))
            .route("/items", post(create_item::<R>))
            .route("/items/{id}", get(get_item::<R>))
            .route("/users", get(list_users::<R>))
            .route("/users/{id}", get(get_user::<R>))
            .route("/sign-up", post(sign_up::<R>))
            .route("/sign-in", post(sign_in::<R>))
            .merge(protected)
            .layer(trace_layer)
            .layer(CorsLayer::permissive())
            .with_state(svc);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // Release the store connection before exiting.
        self.service.close().await;
        tracing::info!("store connection released");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn list_items<R>(
    State(service): State<Arc<ShopService<R>>>,
) -> Result<Json<Vec<Item>>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let items = service.list_items().await?;
    Ok(Json(items))
}

async fn get_item<R>(
    State(service): State<Arc<ShopService<R>>>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<Item>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let item = service.get_item(id).await?;
    Ok(Json(item))
}

async fn create_item<R>(
    State(service): State<Arc<ShopService<R>>>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(axum::http::StatusCode, Json<Item>), AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let item = service.create_item(payload.title, payload.image).await?;
    Ok((axum::http::StatusCode::CREATED, Json(item)))
}

async fn list_users<R>(
    State(service): State<Arc<ShopService<R>>>,
) -> Result<Json<Vec<UserWithOrders>>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let users = service.list_users().await?;
    Ok(Json(users))
}

async fn get_user<R>(
    State(service): State<Arc<ShopService<R>>>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<UserWithOrders>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

async fn sign_up<R>(
    State(service): State<Arc<ShopService<R>>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(axum::http::StatusCode, Json<Session>), AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let session = service
        .sign_up(payload.name, payload.email, payload.password)
        .await?;
    Ok((axum::http::StatusCode::CREATED, Json(session)))
}

async fn sign_in<R>(
    State(service): State<Arc<ShopService<R>>>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<Session>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let session = service.sign_in(payload.email, payload.password).await?;
    Ok(Json(session))
}

async fn validate<R>(
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserWithOrders>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    Ok(Json(identity.user))
}

async fn update_user<R>(
    State(service): State<Arc<ShopService<R>>>,
    Extension(identity): Extension<Identity>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserWithOrders>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let updated = service
        .update_profile(
            identity.user.id,
            id,
            payload.name,
            payload.email,
            payload.password,
        )
        .await?;
    Ok(Json(updated))
}

async fn create_order<R>(
    State(service): State<Arc<ShopService<R>>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<Order>), AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let order = service
        .place_order(identity.user.id, payload.title, payload.quantity)
        .await?;
    Ok((axum::http::StatusCode::CREATED, Json(order)))
}

async fn delete_order<R>(
    State(service): State<Arc<ShopService<R>>>,
    Extension(identity): Extension<Identity>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<Order>, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let order = service.remove_order(identity.user.id, id).await?;
    Ok(Json(order))
}
