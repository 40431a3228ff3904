//! Blocking client for OpenAI-compatible embedding and chat APIs.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

use super::{ChatMessage, ChatModel, Embedder, ProviderError, Result};

/// Client for an OpenAI-compatible HTTP API.
///
/// Implements both [`Embedder`] and [`ChatModel`]; the model identifiers
/// are fixed at construction so the same embedding model is used at
/// ingestion and at query time.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    embedding_model: String,
    chat_model: String,
}

impl OpenAiClient {
    pub fn new(
        provider: &ProviderConfig,
        embedding_model: String,
        chat_model: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            api_key: provider.api_key.clone(),
            embedding_model,
            chat_model,
        })
    }

    fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json()?)
    }
}

// ─── Embeddings ──────────────────────────────────────────

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

impl Embedder for OpenAiClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        log::debug!(
            "Requesting embedding ({} chars) from model {}",
            text.len(),
            self.embedding_model
        );

        let response: EmbeddingResponse = self.post(
            "embeddings",
            &EmbeddingRequest {
                model: &self.embedding_model,
                input: text,
            },
        )?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::MissingData("no embedding in response".to_string()))
    }
}

// ─── Chat completions ────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ChatModel for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        log::debug!(
            "Requesting completion ({} messages) from model {}",
            messages.len(),
            self.chat_model
        );

        let response: ChatResponse = self.post(
            "chat/completions",
            &ChatRequest {
                model: &self.chat_model,
                messages,
                // Deterministic sampling preference
                temperature: 0.0,
            },
        )?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MissingData("no choices in response".to_string()))
    }
}
