//! OpenAI chat-completion client.
//!
//! Thin wrapper over the Chat Completions REST API. The router, research and
//! code capabilities share one client instance; each call carries its own
//! sampling options.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, parse_retry_after};

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Per-call sampling options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatOptions {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }
}

/// Client for the OpenAI HTTP API.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Creates a new client with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sends one user prompt and returns the assistant's text reply.
    pub async fn complete(&self, prompt: &str, options: ChatOptions) -> Result<String, ApiError> {
        if prompt.trim().is_empty() {
            return Err(ApiError::ExecutionFailed(
                "Chat prompt cannot be empty".into(),
            ));
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| ApiError::transport("OpenAI", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body, retry_after));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Other(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, ApiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            ApiError::ExecutionFailed("OpenAI API returned no content in the response".into())
        })
}

fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<std::time::Duration>,
) -> ApiError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.clone());

    ApiError::http(status, message, retry_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_locally() {
        let client = ChatClient::new("test-key");
        let result = client.complete("   ", ChatOptions::default()).await;
        assert!(matches!(result, Err(ApiError::ExecutionFailed(_))));
    }

    #[test]
    fn test_map_http_error_extracts_api_message() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "rate_limit"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), None);

        match err {
            ApiError::ProcessError {
                status_code,
                message,
                is_retryable,
                ..
            } => {
                assert_eq!(status_code, Some(429));
                assert_eq!(message, "Rate limit reached");
                assert!(is_retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string(), None);
        match err {
            ApiError::ProcessError { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_text_response_trims_content() {
        let response = ChatCompletionResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some("  research,code \n".to_string()),
                },
            }],
        };
        assert_eq!(extract_text_response(response).unwrap(), "research,code");
    }

    #[test]
    fn test_extract_text_response_rejects_empty_choices() {
        let response = ChatCompletionResponse { choices: vec![] };
        assert!(extract_text_response(response).is_err());
    }
}
