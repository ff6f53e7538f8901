// SPDX-License-Identifier: MIT

//! ChefGPT: ingredient-based recipe search with GitHub login and favorites.
//!
//! This crate provides the backend API that proxies similarity search
//! against a hosted recipe index and stores per-user favorite recipes.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{GithubService, RecipeSearchService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub github: GithubService,
    pub search: RecipeSearchService,
}
