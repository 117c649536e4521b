/// Gemini HTTP client implementation.
///
/// This module provides `GeminiClient` for making synchronous HTTP requests to the
/// generation and embedding endpoints, along with the error type and builder.
/// Calls are made once: there is no retry and no caching.
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::config::Config;

/// Errors that can occur when calling the remote API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Transport failures (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request or response timed out
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status, with the response body for display
    #[error("API error: status {status}")]
    Http { status: u16, body: String },

    /// The response body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response JSON did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No API key was configured
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// Invalid base URL configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl GeminiError {
    /// Returns true for failures that might succeed if tried again later
    /// (transport errors, timeouts, HTTP 429 and 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            GeminiError::Network(_) | GeminiError::Timeout(_) => true,
            GeminiError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            GeminiError::Serialization(_)
            | GeminiError::MalformedResponse(_)
            | GeminiError::MissingApiKey
            | GeminiError::InvalidUrl(_) => false,
        }
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GeminiError::Timeout(error)
        } else {
            GeminiError::Network(error)
        }
    }
}

/// Builder for constructing `GeminiClient` instances.
///
/// # Examples
///
/// ```
/// use smart_notes::gemini::GeminiClientBuilder;
///
/// let client = GeminiClientBuilder::new()
///     .api_key("test-key")
///     .base_url("http://localhost:8080/v1beta")
///     .build()
///     .expect("Failed to create client");
///
/// assert_eq!(client.generation_model(), "gemini-1.5-flash");
/// ```
#[derive(Debug, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    generation_model: Option<String>,
    embedding_model: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new `GeminiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-filled from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: Some(config.api_base_url.clone()),
            generation_model: Some(config.generation_model.clone()),
            embedding_model: Some(config.embedding_model.clone()),
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL (e.g., "https://generativelanguage.googleapis.com/v1beta").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model used for `generateContent`.
    pub fn generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = Some(model.into());
        self
    }

    /// Sets the model used for `embedContent`.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Builds the `GeminiClient` with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::MissingApiKey` if no key was given and
    /// `GeminiError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<GeminiClient, GeminiError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| crate::config::DEFAULT_API_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| GeminiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(GeminiError::Network)?;

        Ok(GeminiClient {
            client,
            api_key,
            base_url,
            generation_model: self
                .generation_model
                .unwrap_or_else(|| crate::config::DEFAULT_GENERATION_MODEL.to_string()),
            embedding_model: self
                .embedding_model
                .unwrap_or_else(|| crate::config::DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }
}

/// Synchronous HTTP client for the Gemini generation and embedding endpoints.
///
/// Construct it with `GeminiClientBuilder`.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    generation_model: String,
    embedding_model: String,
}

/// Remote model operations used by the ranker and the advisor.
///
/// This trait enables injecting fakes in tests.
pub trait GeminiClientTrait: Send + Sync {
    /// Generates text for `prompt` and returns the first candidate's text.
    fn generate(&self, prompt: &str) -> Result<String, GeminiError>;

    /// Returns the embedding vector for `text`.
    fn embed(&self, text: &str) -> Result<Vec<f32>, GeminiError>;
}

impl GeminiClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generation_model(&self) -> &str {
        &self.generation_model
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// POSTs `body` and returns the parsed JSON response.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<serde_json::Value, GeminiError> {
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .map_err(GeminiError::from_reqwest)?;

        let status = response.status();
        let text = response.text().map_err(GeminiError::from_reqwest)?;

        if !status.is_success() {
            return Err(GeminiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(GeminiError::Serialization)
    }
}

impl GeminiClientTrait for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = self.endpoint(&self.generation_model, "generateContent");
        let json = self.post_json(&url, &generation_request(prompt))?;
        parse_generation_response(&json)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, GeminiError> {
        let url = self.endpoint(&self.embedding_model, "embedContent");
        let json = self.post_json(&url, &embedding_request(&self.embedding_model, text))?;
        parse_embedding_response(&json)
    }
}

/// Request body for `generateContent`.
pub(crate) fn generation_request(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }]
    })
}

/// Request body for `embedContent`.
pub(crate) fn embedding_request(model: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "model": format!("models/{model}"),
        "content": {
            "parts": [{ "text": text }]
        }
    })
}

/// Extracts `candidates[0].content.parts[0].text`.
pub(crate) fn parse_generation_response(json: &serde_json::Value) -> Result<String, GeminiError> {
    let candidates = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| GeminiError::MalformedResponse("No response from AI".to_string()))?;

    candidates[0]
        .pointer("/content/parts/0/text")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            GeminiError::MalformedResponse("Missing 'text' in first candidate".to_string())
        })
}

/// Extracts `embedding.values` as `f32`s.
pub(crate) fn parse_embedding_response(json: &serde_json::Value) -> Result<Vec<f32>, GeminiError> {
    let values = json
        .pointer("/embedding/values")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            GeminiError::MalformedResponse("Missing 'embedding.values' in response".to_string())
        })?;

    values
        .iter()
        .map(|v| {
            v.as_f64().map(|f| f as f32).ok_or_else(|| {
                GeminiError::MalformedResponse("Non-numeric embedding value".to_string())
            })
        })
        .collect()
}
