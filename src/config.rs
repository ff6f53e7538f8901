//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and kept in memory; handlers only
//! ever see an immutable `Config` inside the shared state.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub OAuth client ID (public)
    pub github_client_id: String,
    /// GitHub OAuth client secret
    pub github_client_secret: String,
    /// Redirect URI registered with the GitHub OAuth app
    pub github_redirect_uri: String,
    /// Application callback that receives code+state after we validate them
    pub app_callback_url: String,
    /// OpenAI API key for embedding generation
    pub openai_api_key: String,
    /// Pinecone API key
    pub pinecone_api_key: String,
    /// Pinecone index host, e.g. https://recipes-abc123.svc.us-east-1.pinecone.io
    pub pinecone_index_host: String,
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            github_client_id: env::var("GITHUB_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GITHUB_CLIENT_ID"))?,
            github_client_secret: env::var("GITHUB_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GITHUB_CLIENT_SECRET"))?,
            github_redirect_uri: env::var("GITHUB_REDIRECT_URI")
                .map_err(|_| ConfigError::Missing("GITHUB_REDIRECT_URI"))?,
            app_callback_url: env::var("APP_CALLBACK_URL")
                .map_err(|_| ConfigError::Missing("APP_CALLBACK_URL"))?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?,
            pinecone_api_key: env::var("PINECONE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PINECONE_API_KEY"))?,
            pinecone_index_host: env::var("PINECONE_INDEX_HOST")
                .map_err(|_| ConfigError::Missing("PINECONE_INDEX_HOST"))?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for tests only. No real credentials.
    pub fn test_default() -> Self {
        Self {
            github_client_id: "test_client_id".to_string(),
            github_client_secret: "test_secret".to_string(),
            github_redirect_uri: "http://localhost:8080/auth/callback".to_string(),
            app_callback_url: "http://localhost:5173/callback".to_string(),
            openai_api_key: "test_openai_key".to_string(),
            pinecone_api_key: "test_pinecone_key".to_string(),
            pinecone_index_host: "https://recipes.example.test".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
