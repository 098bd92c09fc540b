//! OpenAI-compatible embeddings API client.
//!
//! Provides batch and single-query embedding via any service exposing the
//! `/embeddings` endpoint: OpenAI, Azure OpenAI, Ollama, LiteLLM, etc.
//! The retrieval engine depends only on the [`EmbeddingProvider`] trait, so
//! tests and alternative backends can inject their own implementation.

use thoth_core::{EmbeddingConfig, ThothError};
use serde::{Deserialize, Serialize};

/// An injected embedding capability: text in, fixed-length vectors out.
///
/// Implementations must be order-preserving — `embed_many` returns exactly
/// one vector per input text, in input order — and must produce same-length
/// vectors for a given model. The retrieval engine never retries, times out,
/// or interprets provider failures; a call either returns a complete set of
/// vectors or fails outright.
#[allow(async_fn_in_trait)]
pub trait EmbeddingProvider {
    /// Identifier of the embedding model backing this provider.
    fn model(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ThothError>;

    /// Embed a batch of texts, returning vectors in the same order.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ThothError>;
}

/// Client for an OpenAI-compatible embeddings API.
///
/// # Examples
///
/// ```
/// use thoth_doclens::embedding::{EmbeddingClient, EmbeddingProvider};
///
/// let client = EmbeddingClient::new("test-key");
/// assert_eq!(client.model(), "text-embedding-3-small");
/// ```
pub struct EmbeddingClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const BATCH_SIZE: usize = 64;
const BATCH_DELAY_MS: u64 = 200;

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedDataItem>,
}

#[derive(Deserialize)]
struct EmbedDataItem {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a new client with the given API key and default model.
    ///
    /// # Examples
    ///
    /// ```
    /// use thoth_doclens::embedding::EmbeddingClient;
    ///
    /// let client = EmbeddingClient::new("my-key");
    /// ```
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a client from an [`EmbeddingConfig`].
    ///
    /// Falls back to the `OPENAI_API_KEY` env var if no key is in the config.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Config`] if no API key is available.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use thoth_core::EmbeddingConfig;
    /// use thoth_doclens::embedding::EmbeddingClient;
    ///
    /// let config = EmbeddingConfig::default();
    /// let client = EmbeddingClient::with_config(&config).unwrap();
    /// ```
    pub fn with_config(config: &EmbeddingConfig) -> Result<Self, ThothError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                ThothError::Config(
                    "embedding API key not found: set embedding.api_key in .thoth.toml or OPENAI_API_KEY env var".into(),
                )
            })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
        })
    }

    async fn post_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ThothError> {
        let request = EmbedRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ThothError::Embedding(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".into());
            return Err(ThothError::Embedding(format!(
                "embeddings API returned {status}: {body}"
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| ThothError::Embedding(format!("failed to parse response: {e}")))?;

        if embed_response.data.len() != texts.len() {
            return Err(ThothError::Embedding(format!(
                "embeddings API returned {} vectors for {} inputs",
                embed_response.data.len(),
                texts.len()
            )));
        }

        Ok(embed_response
            .data
            .into_iter()
            .map(|item| item.embedding)
            .collect())
    }

    /// Build the JSON request body for an embed call (for testing).
    #[cfg(test)]
    fn build_request(&self, texts: &[String]) -> EmbedRequest {
        EmbedRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
        }
    }
}

impl EmbeddingProvider for EmbeddingClient {
    fn model(&self) -> &str {
        &self.model
    }

    /// Embed a single query text.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Embedding`] if the API call fails.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ThothError> {
        let vectors = self.post_embeddings(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| ThothError::Embedding("empty response from embeddings API".into()))
    }

    /// Embed a batch of texts. Returns vectors in the same order.
    ///
    /// Splits into sub-batches of 64 with 200ms pauses between requests for
    /// rate limiting.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Embedding`] if any API call fails or returns the
    /// wrong number of vectors.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ThothError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(BATCH_SIZE).enumerate() {
            if i > 0 {
                tokio::time::sleep(tokio::time::Duration::from_millis(BATCH_DELAY_MS)).await;
            }
            let vectors = self.post_embeddings(batch).await?;
            all_embeddings.extend(vectors);
        }

        Ok(all_embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_format_is_correct() {
        let client = EmbeddingClient::new("test-key");
        let texts = vec!["# Overview".to_string(), "# Setup".to_string()];
        let request = client.build_request(&texts);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"].as_array().unwrap().len(), 2);
        assert_eq!(json["input"][0], "# Overview");
    }

    #[test]
    fn response_parsing_works() {
        let json = r#"{
            "data": [
                {"embedding": [0.1, 0.2, 0.3]},
                {"embedding": [0.4, 0.5, 0.6]}
            ]
        }"#;
        let response: EmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(response.data[1].embedding, vec![0.4, 0.5, 0.6]);
    }

    #[test]
    fn batch_splitting_calculates_correctly() {
        let n = 150;
        let texts: Vec<String> = (0..n).map(|i| format!("text {i}")).collect();
        let batches: Vec<&[String]> = texts.chunks(BATCH_SIZE).collect();
        assert_eq!(batches.len(), 3); // 64 + 64 + 22
        assert_eq!(batches[0].len(), 64);
        assert_eq!(batches[1].len(), 64);
        assert_eq!(batches[2].len(), 22);
    }

    #[test]
    fn missing_api_key_gives_clear_error() {
        std::env::remove_var("OPENAI_API_KEY");
        let config = EmbeddingConfig {
            api_key: None,
            ..EmbeddingConfig::default()
        };
        let result = EmbeddingClient::with_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("API key"), "error should mention API key: {err}");
    }

    #[test]
    fn config_base_url_overrides_default() {
        let config = EmbeddingConfig {
            api_key: Some("k".into()),
            base_url: Some("http://localhost:11434/v1".into()),
            ..EmbeddingConfig::default()
        };
        let client = EmbeddingClient::with_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434/v1");
    }
}
