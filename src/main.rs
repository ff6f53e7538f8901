// SPDX-License-Identifier: MIT

//! ChefGPT API Server
//!
//! Serves ingredient-based recipe search backed by a hosted vector index,
//! GitHub OAuth login, and per-user favorite recipes.

use chefgpt::{
    config::Config,
    db::FirestoreDb,
    services::{GithubService, RecipeSearchService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting ChefGPT API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize GitHub identity service
    let github = GithubService::new(
        config.github_client_id.clone(),
        config.github_client_secret.clone(),
        db.clone(),
    );
    tracing::info!("GitHub identity service initialized");

    // Initialize recipe search (OpenAI embeddings + Pinecone index)
    let search = RecipeSearchService::new(
        config.openai_api_key.clone(),
        config.pinecone_index_host.clone(),
        config.pinecone_api_key.clone(),
    );
    tracing::info!(index = %config.pinecone_index_host, "Recipe search initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        github,
        search,
    });

    // Build router
    let app = chefgpt::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chefgpt=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
