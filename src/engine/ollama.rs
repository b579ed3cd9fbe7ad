use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::EngineConfig;
use crate::errors::EngineError;

use super::TranslationEngine;

/// Translation engine backed by a local Ollama-compatible server
pub struct OllamaEngine {
    /// Base URL of the server
    base_url: String,
    /// Model name to generate with
    model: String,
    /// Source language code
    source_language: String,
    /// Target language code
    target_language: String,
    /// Engine input limit in native units
    max_units: usize,
    /// Per-request character ceiling for the batcher
    max_chars: usize,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Generated text
    response: String,
    /// Whether the generation is complete
    #[serde(default)]
    done: bool,
}

impl OllamaEngine {
    /// Create an engine client from the engine configuration
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            max_units: config.max_units,
            max_chars: config.max_chars_per_request,
            client,
        })
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a professional literary translator. Translate the user's text \
             from {} to {}. Preserve the tone and meaning. Output only the translation, \
             with no notes or explanations.",
            self.source_language, self.target_language
        )
    }
}

#[async_trait]
impl TranslationEngine for OllamaEngine {
    async fn translate(&self, text: &str) -> Result<String, EngineError> {
        let units = self.measure(text);
        if units > self.max_units {
            return Err(EngineError::InputTooLong {
                units,
                max_units: self.max_units,
            });
        }

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
            system: Some(self.system_prompt()),
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url);
        debug!("Sending {} units to {}", units, url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Engine returned {}: {}", status, message);
            return Err(EngineError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|e| EngineError::ParseError(e.to_string()))?;

        if !generation.done {
            return Err(EngineError::ParseError(
                "engine reported incomplete generation".to_string(),
            ));
        }

        let translated = generation.response.trim().to_string();
        if translated.is_empty() {
            return Err(EngineError::ParseError(
                "engine returned empty translation".to_string(),
            ));
        }

        Ok(translated)
    }

    // Conservative subword estimate; the engine's real tokenizer is not
    // exposed over the API, and over-counting only makes batches smaller.
    fn measure(&self, text: &str) -> usize {
        let chars = text.chars().count();
        let words = text.split_whitespace().count();
        words.max(chars.div_ceil(3))
    }

    fn max_units(&self) -> usize {
        self.max_units
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn test_connection(&self) -> Result<(), EngineError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::ApiError {
                status_code: status.as_u16(),
                message: format!("version check failed at {}", url),
            });
        }
        Ok(())
    }
}
