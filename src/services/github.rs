// SPDX-License-Identifier: MIT

//! GitHub OAuth client and identity binding.
//!
//! Handles:
//! - Authorization-code exchange at GitHub's token endpoint
//! - Profile fetches for bearer tokens (the token-validity check)
//! - Resolving a GitHub identity to an internal user record,
//!   creating the record on first login

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::User;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    oauth_base: String,
    client_id: String,
    client_secret: String,
}

/// Token endpoint response. GitHub answers 200 even for rejected codes,
/// putting the failure in `error` instead of the status line.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Authenticated user profile from `GET /user`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubProfile {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl GithubClient {
    /// Create a new GitHub client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: super::http_client(),
            api_base: "https://api.github.com".to_string(),
            oauth_base: "https://github.com/login/oauth".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for an access token.
    ///
    /// `client_id`/`client_secret` overrides take precedence over the
    /// registered credentials when the caller supplies them.
    pub async fn exchange_code(
        &self,
        code: &str,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Result<String, AppError> {
        let url = format!("{}/access_token", self.oauth_base);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", client_id.unwrap_or(&self.client_id)),
                ("client_secret", client_secret.unwrap_or(&self.client_secret)),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "GitHub token exchange failed");
            return Err(AppError::GitHubApi(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token_response: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to parse token response: {}", e)))?;

        match token_response.access_token {
            Some(token) => Ok(token),
            None => {
                tracing::warn!(
                    error = token_response.error.as_deref().unwrap_or("unknown"),
                    description = token_response.error_description.as_deref().unwrap_or(""),
                    "GitHub rejected authorization code"
                );
                Err(AppError::BadRequest("token not provided".to_string()))
            }
        }
    }

    /// Fetch the profile behind an access token.
    ///
    /// GitHub tokens are opaque, so this round-trip is the only way to
    /// verify one; a non-success status means the token is invalid,
    /// expired, or revoked.
    pub async fn get_user(&self, access_token: &str) -> Result<GithubProfile, AppError> {
        let url = format!("{}/user", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, "chefgpt")
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Profile fetch failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::InvalidToken);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GitHubApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Profile parse error: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GithubService - identity binding on top of the raw client
// ─────────────────────────────────────────────────────────────────────────────

/// Per-identity locks type used to serialize first logins.
type LoginLocks = Arc<DashMap<u64, Arc<Mutex<()>>>>;

/// Result of a completed token exchange.
#[derive(Debug, Clone)]
pub struct TokenExchangeOutcome {
    pub access_token: String,
    pub user: User,
}

/// High-level GitHub identity service.
///
/// Wraps the raw client with the User Directory binding: every credential
/// is resolved to an internal user record before anything else trusts it.
#[derive(Clone)]
pub struct GithubService {
    client: Option<GithubClient>,
    db: FirestoreDb,
    /// Per-identity mutex so concurrent first logins cannot race the
    /// lookup-then-insert within this process. Cross-process, the store's
    /// document-ID uniqueness backstops the same invariant.
    login_locks: LoginLocks,
}

impl GithubService {
    /// Create a new GitHub service.
    pub fn new(client_id: String, client_secret: String, db: FirestoreDb) -> Self {
        Self {
            client: Some(GithubClient::new(client_id, client_secret)),
            db,
            login_locks: Arc::new(DashMap::new()),
        }
    }

    /// Create a mock service for testing (offline mode).
    ///
    /// Any call that would reach GitHub returns an error instead.
    pub fn new_mock(db: FirestoreDb) -> Self {
        Self {
            client: None,
            db,
            login_locks: Arc::new(DashMap::new()),
        }
    }

    fn get_client(&self) -> Result<&GithubClient, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::GitHubApi("GitHub client not configured (offline mode)".to_string())
        })
    }

    /// Handle a token exchange: code -> token -> profile -> user record.
    pub async fn handle_token_exchange(
        &self,
        code: &str,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Result<TokenExchangeOutcome, AppError> {
        let client = self.get_client()?;

        let access_token = client.exchange_code(code, client_id, client_secret).await?;
        let profile = client.get_user(&access_token).await?;
        let user = self.resolve_user(&profile).await?;

        tracing::info!(
            github_user_id = profile.id,
            login = %profile.login,
            user_id = %user.id,
            "Token exchange completed"
        );

        Ok(TokenExchangeOutcome { access_token, user })
    }

    /// Resolve a bearer token to a registered user.
    ///
    /// Validates the token against GitHub, then requires the identity to
    /// already exist in the directory. Login is the only path that
    /// creates user records.
    pub async fn resolve_bearer(&self, access_token: &str) -> Result<User, AppError> {
        let profile = self.get_client()?.get_user(access_token).await?;

        self.db
            .get_user_by_github_id(profile.id)
            .await?
            .ok_or(AppError::UnregisteredUser(profile.id))
    }

    /// Look up the user record for a GitHub identity, creating it on
    /// first login.
    ///
    /// The per-identity lock plus the store's document-ID constraint make
    /// this behave as one logical insert-if-absent: a lost race re-reads
    /// the winner's record instead of creating a second row.
    async fn resolve_user(&self, profile: &GithubProfile) -> Result<User, AppError> {
        let lock = self
            .login_locks
            .entry(profile.id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if let Some(existing) = self.db.get_user_by_github_id(profile.id).await? {
            return Ok(existing);
        }

        let user = user_from_profile(profile);

        match self.db.insert_user(&user).await {
            Ok(()) => {
                tracing::info!(
                    github_user_id = profile.id,
                    user_id = %user.id,
                    "Created user on first login"
                );
                Ok(user)
            }
            Err(insert_err) => {
                // Another instance may have inserted between our read and
                // write; the document-ID constraint rejects the duplicate.
                match self.db.get_user_by_github_id(profile.id).await? {
                    Some(existing) => {
                        tracing::info!(
                            github_user_id = profile.id,
                            "Lost first-login race, using existing record"
                        );
                        Ok(existing)
                    }
                    None => Err(insert_err),
                }
            }
        }
    }
}

/// Build a new user record from a GitHub profile.
///
/// GitHub may withhold both name and email; the login and its no-reply
/// address stand in so the record is always complete.
fn user_from_profile(profile: &GithubProfile) -> User {
    let email = profile
        .email
        .clone()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| format!("{}@users.noreply.github.com", profile.login));

    let name = profile
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| profile.login.clone());

    User {
        id: Uuid::new_v4(),
        github_user_id: profile.id,
        email,
        name,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}
