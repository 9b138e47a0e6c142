use reqwest::Client;
use tracing::{debug, error, warn};

use crate::error::{InferenceError, InferenceResult};
use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, InferenceRequest};

/// GitHub Models inference root
pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference";

/// Client for an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    token: String,
    endpoint: String,
}

impl InferenceClient {
    pub fn new(token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: Client::new(),
            token: token.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one completion. Any failure, and a completion without content,
    /// comes back as `None`.
    pub async fn infer(&self, request: &InferenceRequest) -> Option<String> {
        match self.chat_completion(request).await {
            Ok(Some(content)) if !content.is_empty() => Some(content),
            Ok(_) => {
                warn!(model = %request.model, "Inference returned no content");
                None
            }
            Err(e) => {
                error!(model = %request.model, error = %e, "Inference request failed");
                None
            }
        }
    }

    pub async fn chat_completion(
        &self,
        request: &InferenceRequest,
    ) -> InferenceResult<Option<String>> {
        debug!(
            "Creating chat completion with model {} at {}",
            request.model, self.endpoint
        );

        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages(),
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!("Rate limited by inference endpoint");
                return Err(InferenceError::RateLimited);
            }

            if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                return Err(InferenceError::Api {
                    message: error_resp.error.message,
                    status_code: Some(status.as_u16()),
                });
            }

            return Err(InferenceError::Api {
                message: error_text,
                status_code: Some(status.as_u16()),
            });
        }

        let text = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&text)?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                model = completion.model.as_deref().unwrap_or(&request.model),
                "Chat completion usage"
            );
        }

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> InferenceRequest {
        InferenceRequest {
            content: "The app crashes when I click save".to_string(),
            system_message: "Assess the bug report".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: Some(100),
        }
    }

    #[test]
    fn test_client_creation_trims_endpoint() {
        let client = InferenceClient::new("test-key", "https://models.github.ai/inference/");
        assert_eq!(client.token, "test-key");
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn test_infer_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "openai/gpt-4o-mini",
                "max_tokens": 100,
                "messages": [
                    {"role": "system", "content": "Assess the bug report"},
                    {"role": "user", "content": "The app crashes when I click save"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "### Assessment: High"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new("test-key", server.uri());
        let result = client.infer(&request()).await;
        assert_eq!(result.as_deref(), Some("### Assessment: High"));
    }

    #[tokio::test]
    async fn test_infer_server_error_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "upstream failure", "code": "internal"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = InferenceClient::new("test-key", server.uri());
        assert!(client.infer(&request()).await.is_none());

        let err = client.chat_completion(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Api {
                status_code: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_infer_empty_choices_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = InferenceClient::new("test-key", server.uri());
        assert!(client.infer(&request()).await.is_none());
    }

    #[tokio::test]
    async fn test_infer_rate_limited_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = InferenceClient::new("test-key", server.uri());
        assert!(matches!(
            client.chat_completion(&request()).await,
            Err(InferenceError::RateLimited)
        ));
        assert!(client.infer(&request()).await.is_none());
    }

    #[tokio::test]
    async fn test_infer_unreachable_endpoint_is_absent() {
        let client = InferenceClient::new("test-key", "http://127.0.0.1:1");
        assert!(client.infer(&request()).await.is_none());
    }
}
