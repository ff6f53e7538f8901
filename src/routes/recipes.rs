// SPDX-License-Identifier: MIT

//! Recipe routes: similarity search plus per-user favorites.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FavoriteRecipe, RecipeDocument};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Public search route (no auth required).
pub fn search_routes() -> Router<Arc<AppState>> {
    Router::new().route("/recipes", get(search_recipes))
}

/// Favorites routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn favorites_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recipes/save", post(save_favorite))
        .route("/recipes/favorites", get(list_favorites))
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchParams {
    ingredient: String,
}

/// Find recipes for an ingredient via the vector index.
async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RecipeDocument>>> {
    if params.ingredient.trim().is_empty() {
        return Err(AppError::BadRequest(
            "ingredient must not be empty".to_string(),
        ));
    }

    let documents = state.search.search(&params.ingredient).await?;

    tracing::info!(
        ingredient = %params.ingredient,
        results = documents.len(),
        "Recipe search served"
    );

    Ok(Json(documents))
}

// ─── Favorites ───────────────────────────────────────────────

/// Request body for saving a favorite.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveRecipeRequest {
    #[validate(length(min = 1, message = "recipe_id must not be empty"))]
    pub recipe_id: String,
    #[validate(length(min = 1, message = "recipe_name must not be empty"))]
    pub recipe_name: String,
    #[validate(length(min = 1, message = "recipe_detail must not be empty"))]
    pub recipe_detail: String,
}

/// Acknowledgment for a saved favorite.
#[derive(Serialize)]
pub struct SaveRecipeResponse {
    pub success: bool,
    pub message: String,
}

/// One favorite row as returned to the caller.
#[derive(Serialize)]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub recipe_id: String,
    pub recipe_name: String,
    pub recipe_detail: String,
    pub created_at: String,
}

impl From<FavoriteRecipe> for FavoriteResponse {
    fn from(favorite: FavoriteRecipe) -> Self {
        Self {
            id: favorite.id,
            recipe_id: favorite.recipe_id,
            recipe_name: favorite.recipe_name,
            recipe_detail: favorite.recipe_detail,
            created_at: favorite.created_at,
        }
    }
}

/// Save a recipe as a favorite of the authenticated user.
async fn save_favorite(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SaveRecipeRequest>,
) -> Result<Json<SaveRecipeResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let favorite = FavoriteRecipe {
        id: Uuid::new_v4(),
        user_id: auth.user.id,
        recipe_id: payload.recipe_id,
        recipe_name: payload.recipe_name,
        recipe_detail: payload.recipe_detail,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.insert_favorite(&favorite).await?;

    tracing::info!(
        user_id = %auth.user.id,
        recipe_id = %favorite.recipe_id,
        "Favorite saved"
    );

    Ok(Json(SaveRecipeResponse {
        success: true,
        message: "Recipe saved to favorites".to_string(),
    }))
}

/// List every favorite owned by the authenticated user.
async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FavoriteResponse>>> {
    let favorites = state.db.list_favorites(auth.user.id).await?;

    Ok(Json(
        favorites.into_iter().map(FavoriteResponse::from).collect(),
    ))
}
