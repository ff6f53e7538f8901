// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod favorite;
pub mod oauth;
pub mod user;

pub use favorite::{FavoriteRecipe, RecipeDocument};
pub use oauth::OAuthState;
pub use user::User;
