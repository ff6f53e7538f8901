// SPDX-License-Identifier: MIT

//! OpenAI embedding client.
//!
//! Converts free-text ingredient queries into vectors for the Pinecone
//! index. The index was populated with the same model, so the model name
//! must not change independently of the stored vectors.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Embedding model matching the vectors stored in the recipe index.
const EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// OpenAI embeddings API client.
#[derive(Clone)]
pub struct EmbeddingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a new embedding client.
    pub fn new(api_key: String) -> Self {
        Self {
            http: super::http_client(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
        }
    }

    /// Convert a text query into an embedding vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let url = format!("{}/embeddings", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: EMBEDDING_MODEL,
                input: text,
            })
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Embedding API returned HTTP {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Embedding response parse error: {}", e)))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::Search("Embedding response contained no vectors".to_string()))
    }
}
