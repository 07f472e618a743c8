use crate::config::LlmConfig;
use crate::error::ExtractError;
use crate::llm::ModelClient;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

/// Chat client for an Ollama host, speaking its OpenAI-compatible API.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Self {
        OllamaClient {
            client: Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaClient {
            client: Client::new(),
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await
            .map_err(|e| ExtractError::UpstreamUnavailable(e.to_string()))?;

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ExtractError::UpstreamUnavailable(e.to_string()))?;
        debug!("model response: {response_body:?}");

        // The API reports errors in-band
        if let Some(error) = response_body.get("error") {
            let message = error
                .as_str()
                .unwrap_or_else(|| error["message"].as_str().unwrap_or("unknown error"));
            return Err(ExtractError::UpstreamUnavailable(message.to_string()));
        }

        response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ExtractError::UpstreamUnavailable(
                    "missing message content in model response".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"title\": \"Pasta\", \"ingredients\": [], \"instructions\": []}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = OllamaClient::with_base_url(server.url(), "llama2:13b-chat-q4_0".to_string());
        let content = client.chat("system", "user").await.unwrap();
        assert!(content.contains("Pasta"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_field_is_upstream_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "model not loaded"}"#)
            .create_async()
            .await;

        let client = OllamaClient::with_base_url(server.url(), "llama2:13b-chat-q4_0".to_string());
        let err = client.chat("system", "user").await.unwrap_err();
        assert!(matches!(err, ExtractError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_unavailable() {
        // Nothing listens on this port
        let client =
            OllamaClient::with_base_url("http://127.0.0.1:1".to_string(), "llama2".to_string());
        let err = client.chat("system", "user").await.unwrap_err();
        assert!(matches!(err, ExtractError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn model_id_reports_configured_model() {
        let client = OllamaClient::with_base_url(
            "http://localhost:11434".to_string(),
            "llama2:13b-chat-q4_0".to_string(),
        );
        assert_eq!(client.model_id(), "llama2:13b-chat-q4_0");
    }
}
