//! User model for storage and API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User profile stored in Firestore.
///
/// The Firestore document ID is `github_user_id`, which gives the
/// directory a store-level uniqueness constraint on the external
/// identity. `id` is the internal ownership key and never changes
/// once assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal user ID. All favorites are owned by this value.
    pub id: Uuid,
    /// GitHub account ID (also used as document ID)
    pub github_user_id: u64,
    /// Email address (sentinel when GitHub does not share one)
    pub email: String,
    /// Display name (falls back to the GitHub login)
    pub name: String,
    /// When the user first completed login
    pub created_at: String,
}
