//! Ollama-style HTTP embedding backend with retry support

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::{EmbeddingMode, EmbeddingProvider};

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedding client for an Ollama `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

impl OllamaEmbedder {
    /// Create a new embedder from configuration.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn prefix_for_mode(&self, mode: EmbeddingMode) -> &'static str {
        if !self.config.mode_prefixes {
            return "";
        }
        match mode {
            EmbeddingMode::Document => "passage: ",
            EmbeddingMode::Query => "query: ",
        }
    }

    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Embedding request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::embedding("unknown error")))
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let request = EmbedRequest {
            model: self.config.model.clone(),
            prompt: text.to_string(),
        };

        self.retry_request(|| {
            let url = url.clone();
            let client = self.client.clone();
            let request = EmbedRequest {
                model: request.model.clone(),
                prompt: request.prompt.clone(),
            };
            async move {
                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await?
                    .error_for_status()?;
                let parsed: EmbedResponse = response.json().await?;
                if parsed.embedding.is_empty() {
                    return Err(Error::embedding("backend returned an empty vector"));
                }
                Ok(parsed.embedding)
            }
        })
        .await
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, texts: &[String], mode: EmbeddingMode) -> Result<Vec<Vec<f32>>> {
        // The endpoint takes one prompt per request; batch calls loop here
        // and the executor parallelizes above this layer.
        let prefix = self.prefix_for_mode(mode);
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            let prompt = if prefix.is_empty() {
                text.clone()
            } else {
                format!("{prefix}{text}")
            };
            vectors.push(self.embed_one(&prompt).await?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
