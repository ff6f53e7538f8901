// SPDX-License-Identifier: MIT

//! Bearer token authentication middleware.
//!
//! GitHub access tokens are opaque, so every request is validated by a
//! profile fetch against GitHub and then resolved to an internal user
//! record. A request never reaches a handler - or the store - without a
//! resolved owner.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: crate::models::User,
}

/// Middleware that requires a valid bearer token for a registered user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let user = state.github.resolve_bearer(&token).await?;

    request.extensions_mut().insert(AuthUser { user });

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(request: &Request) -> Option<String> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
