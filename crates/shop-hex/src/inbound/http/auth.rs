use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use shop_types::domain::user::UserWithOrders;
use shop_types::ports::shop_repository::ShopRepository;

use crate::application::shop_service::ShopService;
use crate::errors::AppError;

/// The caller resolved from a verified token, available to protected
/// handlers as a request extension.
#[derive(Clone)]
pub struct Identity {
    pub user: UserWithOrders,
}

/// Verifies the raw `Authorization` value (the token is the whole header,
/// no `Bearer ` prefix) and stores the resolved caller in the request.
pub async fn require_identity<R>(
    State(service): State<Arc<ShopService<R>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError>
where
    R: ShopRepository + Send + Sync + 'static,
{
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = service.authenticate(header).await?;
    req.extensions_mut().insert(Identity { user });

    Ok(next.run(req).await)
}
