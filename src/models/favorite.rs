// SPDX-License-Identifier: MIT

//! Favorite recipe and search result models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved favorite recipe, stored in Firestore.
///
/// `user_id` always references `User::id` (the internal UUID), never the
/// GitHub account ID. Duplicate `(user_id, recipe_id)` pairs are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecipe {
    /// Row ID (also used as document ID)
    pub id: Uuid,
    /// Internal ID of the owning user
    pub user_id: Uuid,
    /// Caller-supplied recipe identifier (opaque)
    pub recipe_id: String,
    /// Recipe name
    pub recipe_name: String,
    /// Free-text recipe detail
    pub recipe_detail: String,
    /// When the favorite was saved (RFC3339)
    pub created_at: String,
}

/// A single recipe search hit, projected down to its text payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeDocument {
    pub page_content: String,
}
