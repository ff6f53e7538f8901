// SPDX-License-Identifier: MIT

//! GitHub OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::OAuthState;
use crate::AppState;

/// OAuth scope requested from GitHub.
const OAUTH_SCOPE: &str = "read:user user:email";

/// Random bytes in a generated state token.
const STATE_TOKEN_BYTES: usize = 32;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth", get(auth_start))
        .route("/auth/callback", get(auth_callback))
        .route("/token", post(token_exchange))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Caller-chosen state token. A fresh one is generated when absent.
    #[serde(default)]
    state: Option<String>,
}

/// Start OAuth flow - persist a one-time state and redirect to GitHub.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
) -> Result<Redirect> {
    let state_token = match params.state.filter(|s| !s.is_empty()) {
        Some(provided) => provided,
        None => generate_state_token()?,
    };

    state
        .db
        .insert_oauth_state(&OAuthState {
            state: state_token.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
        .await?;

    let auth_url = format!(
        "https://github.com/login/oauth/authorize?\
         client_id={}&\
         redirect_uri={}&\
         scope={}&\
         state={}",
        state.config.github_client_id,
        urlencoding::encode(&state.config.github_redirect_uri),
        urlencoding::encode(OAUTH_SCOPE),
        urlencoding::encode(&state_token),
    );

    tracing::info!(
        client_id = %state.config.github_client_id,
        "Starting OAuth flow, redirecting to GitHub"
    );

    Ok(Redirect::temporary(&auth_url))
}

/// Generate a random URL-safe state token.
fn generate_state_token() -> Result<String> {
    let mut bytes = [0u8; STATE_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate state token")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    code: String,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - validate the state, then hand code+state onward.
///
/// The state must have been issued by us, be unconsumed, and be inside
/// its TTL. Consumption happens before the redirect so a replayed
/// callback fails.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    // Check for OAuth errors relayed by GitHub
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from GitHub");
        let redirect = format!(
            "{}?error={}",
            state.config.app_callback_url,
            urlencoding::encode(&error)
        );
        return Ok(Redirect::temporary(&redirect));
    }

    let pending = state
        .db
        .get_oauth_state(&params.state)
        .await?
        .ok_or(AppError::InvalidState)?;

    // Single-use: consume before anything else can see it.
    state.db.delete_oauth_state(&params.state).await?;

    if pending.is_expired(chrono::Utc::now()) {
        tracing::warn!("OAuth state past TTL");
        return Err(AppError::InvalidState);
    }

    tracing::info!("OAuth state validated, forwarding code to application");

    let redirect = format!(
        "{}?code={}&state={}",
        state.config.app_callback_url,
        urlencoding::encode(&params.code),
        urlencoding::encode(&params.state),
    );

    Ok(Redirect::temporary(&redirect))
}

/// Form body for the token exchange.
#[derive(Deserialize)]
pub struct TokenExchangeForm {
    code: String,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
}

/// Response for a completed token exchange.
#[derive(Serialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub external_id: u64,
    pub email: String,
    pub name: String,
}

/// Exchange an authorization code for a token and resolve the user.
async fn token_exchange(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenExchangeForm>,
) -> Result<Json<TokenExchangeResponse>> {
    if form.code.is_empty() {
        return Err(AppError::BadRequest("code must not be empty".to_string()));
    }

    let outcome = state
        .github
        .handle_token_exchange(
            &form.code,
            form.client_id.as_deref(),
            form.client_secret.as_deref(),
        )
        .await?;

    Ok(Json(TokenExchangeResponse {
        access_token: outcome.access_token,
        external_id: outcome.user.github_user_id,
        email: outcome.user.email,
        name: outcome.user.name,
    }))
}
