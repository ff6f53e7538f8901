// SPDX-License-Identifier: MIT

//! Recipe similarity search composed from embedding + Pinecone query.
//!
//! The composition is deliberately thin: embed the ingredient, ask the
//! index for the nearest stored documents, project each match down to its
//! text payload. Ordering is whatever Pinecone returned; no re-ranking.

use crate::error::AppError;
use crate::models::RecipeDocument;
use crate::services::EmbeddingClient;
use serde::{Deserialize, Serialize};

/// How many nearest documents a search returns at most.
pub const SEARCH_TOP_K: u32 = 5;

/// Metadata key langchain-style loaders store the document text under.
const TEXT_METADATA_KEY: &str = "text";

// ─────────────────────────────────────────────────────────────────────────────
// PineconeClient - raw index access
// ─────────────────────────────────────────────────────────────────────────────

/// Pinecone vector index client.
#[derive(Clone)]
pub struct PineconeClient {
    http: reqwest::Client,
    index_host: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: u32,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// A single ranked match from the index.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl PineconeClient {
    /// Create a client for one index host.
    pub fn new(index_host: String, api_key: String) -> Self {
        Self {
            http: super::http_client(),
            index_host,
            api_key,
        }
    }

    /// Query the index for the `top_k` nearest stored documents.
    pub async fn query(&self, vector: Vec<f32>, top_k: u32) -> Result<Vec<QueryMatch>, AppError> {
        let url = format!("{}/query", self.index_host.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Index query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Index returned HTTP {}: {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Index response parse error: {}", e)))?;

        Ok(parsed.matches)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RecipeSearchService - the composition the /recipes route calls
// ─────────────────────────────────────────────────────────────────────────────

struct SearchBackend {
    embedding: EmbeddingClient,
    index: PineconeClient,
}

/// Ingredient similarity search over the hosted recipe index.
#[derive(Clone)]
pub struct RecipeSearchService {
    backend: Option<std::sync::Arc<SearchBackend>>,
}

impl RecipeSearchService {
    /// Create a search service backed by OpenAI embeddings and Pinecone.
    pub fn new(openai_api_key: String, pinecone_index_host: String, pinecone_api_key: String) -> Self {
        Self {
            backend: Some(std::sync::Arc::new(SearchBackend {
                embedding: EmbeddingClient::new(openai_api_key),
                index: PineconeClient::new(pinecone_index_host, pinecone_api_key),
            })),
        }
    }

    /// Create a mock search service for testing (offline mode).
    ///
    /// Every search will return an error if called.
    pub fn new_mock() -> Self {
        Self { backend: None }
    }

    /// Find the recipes most relevant to an ingredient.
    ///
    /// An empty match set is a success, not an error. Any upstream failure
    /// is translated to `AppError::Search` here and never escapes raw.
    pub async fn search(&self, ingredient: &str) -> Result<Vec<RecipeDocument>, AppError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            AppError::Search("Search backend not configured (offline mode)".to_string())
        })?;

        let vector = backend.embedding.embed(ingredient).await?;
        let matches = backend.index.query(vector, SEARCH_TOP_K).await?;

        tracing::debug!(
            ingredient,
            matches = matches.len(),
            "Recipe search completed"
        );

        Ok(project_documents(matches))
    }
}

/// Project ranked matches to their text payloads, preserving order.
///
/// Matches without a text payload are skipped rather than surfaced as
/// empty documents.
fn project_documents(matches: Vec<QueryMatch>) -> Vec<RecipeDocument> {
    matches
        .into_iter()
        .filter_map(|m| {
            let text = m
                .metadata
                .as_ref()
                .and_then(|meta| meta.get(TEXT_METADATA_KEY))
                .and_then(|v| v.as_str())
                .unwrap_or_default();

            if text.is_empty() {
                tracing::warn!(match_id = %m.id, "Index match has no text payload, skipping");
                return None;
            }

            Some(RecipeDocument {
                page_content: text.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_with_text(id: &str, text: Option<&str>) -> QueryMatch {
        let metadata = text.map(|t| {
            let mut meta = serde_json::Map::new();
            meta.insert(
                TEXT_METADATA_KEY.to_string(),
                serde_json::Value::String(t.to_string()),
            );
            meta
        });
        QueryMatch {
            id: id.to_string(),
            metadata,
        }
    }

    #[test]
    fn test_projection_preserves_order() {
        let docs = project_documents(vec![
            match_with_text("a", Some("first recipe")),
            match_with_text("b", Some("second recipe")),
            match_with_text("c", Some("third recipe")),
        ]);

        let contents: Vec<&str> = docs.iter().map(|d| d.page_content.as_str()).collect();
        assert_eq!(contents, vec!["first recipe", "second recipe", "third recipe"]);
    }

    #[test]
    fn test_projection_skips_matches_without_text() {
        let docs = project_documents(vec![
            match_with_text("a", Some("kept")),
            match_with_text("b", None),
            match_with_text("c", Some("")),
            match_with_text("d", Some("also kept")),
        ]);

        let contents: Vec<&str> = docs.iter().map(|d| d.page_content.as_str()).collect();
        assert_eq!(contents, vec!["kept", "also kept"]);
    }

    #[test]
    fn test_projection_of_empty_matches() {
        assert!(project_documents(vec![]).is_empty());
    }

    #[tokio::test]
    async fn test_mock_search_fails_with_search_error() {
        let service = RecipeSearchService::new_mock();
        let err = service.search("paneer").await.unwrap_err();
        assert!(matches!(err, AppError::Search(_)));
    }

    #[test]
    fn test_query_request_uses_pinecone_field_names() {
        let request = QueryRequest {
            vector: vec![0.1, 0.2],
            top_k: SEARCH_TOP_K,
            include_metadata: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 5);
        assert_eq!(json["includeMetadata"], true);
    }
}
