//! Thin client for an OpenAI-compatible chat/embeddings API.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Default API base when `LLM_BASE_URL` is unset.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
/// Default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// LLM connection settings.
///
/// The API key is optional: without one, `is_configured()` is false and
/// every call fails with [`AnalysisError::NoConfigurado`], which the HTTP
/// layer maps to a structured error instead of a panic at startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
}

impl LlmConfig {
    /// Read the LLM settings from the environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `OPENAI_API_KEY` | unset (analysis disabled) |
    /// | `LLM_BASE_URL` | `https://api.openai.com/v1` |
    /// | `LLM_CHAT_MODEL` | `gpt-4o` |
    /// | `LLM_EMBEDDING_MODEL` | `text-embedding-3-small` |
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            chat_model: std::env::var("LLM_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: std::env::var("LLM_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
        }
    }
}

/// Client for the chat and embeddings endpoints.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
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

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, AnalysisError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(AnalysisError::NoConfigurado)
    }

    /// One-shot chat completion.
    pub async fn chat(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AnalysisError> {
        let key = self.api_key()?;
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let response: ChatResponse = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnalysisError::RespuestaInvalida("sin choices".into()))
    }

    /// Embed a batch of texts, preserving order.
    pub async fn embed(&self, textos: &[String]) -> Result<Vec<Vec<f32>>, AnalysisError> {
        let key = self.api_key()?;
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: textos,
        };

        let response: EmbeddingResponse = self
            .http
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.data.len() != textos.len() {
            return Err(AnalysisError::RespuestaInvalida(format!(
                "se pidieron {} embeddings, llegaron {}",
                textos.len(),
                response.data.len()
            )));
        }
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}
