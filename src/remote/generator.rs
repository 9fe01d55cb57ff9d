//! Remote text generation clients
//!
//! Either backend may be unreachable; callers treat every error as
//! "no remote answer" and carry on locally.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::errors::{NovaError, Result};

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default Gemini API endpoint
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A remote model that completes a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Complete a prompt into a reply
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Ollama `/api/generate` client (non-streaming)
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NovaError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NovaError::RemoteModel(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NovaError::RemoteModel(format!("HTTP {}: {}", status, error_text)));
        }

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| NovaError::RemoteModel(format!("Failed to parse response: {}", e)))?;

        non_empty(body.response)
    }
}

/// Google Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(base_url: &str, model: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NovaError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    /// Build from `GEMINI_API_KEY`; `None` when the key is unset
    pub fn from_env(model: &str, timeout: Duration) -> Result<Option<Self>> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                Self::new(DEFAULT_GEMINI_URL, model, key, timeout).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| NovaError::RemoteModel(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(NovaError::RemoteModel(format!("HTTP {}", response.status())));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NovaError::RemoteModel(format!("Failed to parse response: {}", e)))?;

        let text = body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        non_empty(text)
    }
}

fn non_empty(text: String) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NovaError::RemoteModel("empty completion".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_ollama_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"model": "qwen", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "qwen",
                "response": "  Jakarta adalah ibukota.  ",
                "done": true
            })))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri(), "qwen", TIMEOUT).unwrap();
        let reply = generator.complete("ibukota indonesia?").await.unwrap();
        assert_eq!(reply, "Jakarta adalah ibukota.");
    }

    #[tokio::test]
    async fn test_ollama_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri(), "qwen", TIMEOUT).unwrap();
        let err = generator.complete("halo").await.unwrap_err();
        assert!(err.to_string().contains("model not loaded"));
    }

    #[tokio::test]
    async fn test_ollama_empty_completion_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "   "})))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(&server.uri(), "qwen", TIMEOUT).unwrap();
        assert!(generator.complete("halo").await.is_err());
    }

    #[tokio::test]
    async fn test_gemini_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Halo! " }, { "text": "Ada yang bisa dibantu?" }] }
                }]
            })))
            .mount(&server)
            .await;

        let generator =
            GeminiGenerator::new(&server.uri(), "gemini-2.5-flash", "secret".to_string(), TIMEOUT).unwrap();
        let reply = generator.complete("halo").await.unwrap();
        assert_eq!(reply, "Halo! Ada yang bisa dibantu?");
    }

    #[tokio::test]
    async fn test_gemini_missing_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let generator =
            GeminiGenerator::new(&server.uri(), "gemini-2.5-flash", "secret".to_string(), TIMEOUT).unwrap();
        assert!(matches!(generator.complete("halo").await, Err(NovaError::RemoteModel(_))));
    }
}
