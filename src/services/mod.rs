// SPDX-License-Identifier: MIT

//! Services module - external collaborators and composition logic.

pub mod embedding;
pub mod github;
pub mod search;

pub use embedding::EmbeddingClient;
pub use github::{GithubService, TokenExchangeOutcome};
pub use search::RecipeSearchService;

use std::time::Duration;

/// Timeout applied to every outbound HTTP call.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Build the shared outbound HTTP client.
///
/// Called once per service at startup; a missing TLS backend is fatal.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
}
