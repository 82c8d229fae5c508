//! Responses API Client
//!
//! Implementation of `CompletionClient` over a Responses-style HTTP
//! endpoint (`POST {base}/v1/responses`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use supervisor_core::{
    error::{Result, SupervisorError},
    message::{InputItem, RequestPayload},
    provider::{CompletionClient, CompletionResult, OutputItem},
    tool::FunctionDeclaration,
};

/// Responses client configuration
#[derive(Clone, Debug)]
pub struct ResponsesConfig {
    /// Service base URL
    pub base_url: String,

    /// Endpoint path under the base URL
    pub api_path: String,

    /// Bearer token; no header is sent when absent
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_path: "/v1/responses".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl ResponsesConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("SUPERVISOR_API_BASE").unwrap_or(defaults.base_url);
        let api_path = std::env::var("SUPERVISOR_API_PATH").unwrap_or(defaults.api_path);
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let timeout_secs = std::env::var("SUPERVISOR_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            api_path,
            api_key,
            timeout_secs,
        }
    }

    /// Full endpoint URL
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.api_path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Wire body of one submission
#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [InputItem],
    tools: &'a [FunctionDeclaration],
    parallel_tool_calls: bool,
}

impl<'a> ResponsesRequest<'a> {
    /// Tool calls are always requested sequentially
    fn from_payload(payload: &'a RequestPayload) -> Self {
        Self {
            model: payload.model(),
            input: payload.input(),
            tools: payload.tools(),
            parallel_tool_calls: false,
        }
    }
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,

    #[serde(default)]
    error: Option<Value>,
}

/// Responses-style completion client
pub struct ResponsesClient {
    http: reqwest::Client,
    config: ResponsesConfig,
}

impl ResponsesClient {
    /// Create from configuration
    pub fn from_config(config: ResponsesConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SupervisorError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(ResponsesConfig::from_env())
    }

    pub const fn config(&self) -> &ResponsesConfig {
        &self.config
    }

    async fn post(&self, payload: &RequestPayload) -> Result<Vec<OutputItem>> {
        let body = ResponsesRequest::from_payload(payload);

        let mut request = self.http.post(self.config.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SupervisorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupervisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| SupervisorError::Transport(e.to_string()))?;

        decode_response(&text)
    }
}

/// Decode a 2xx body into output items
fn decode_response(text: &str) -> Result<Vec<OutputItem>> {
    let decoded: ResponsesResponse =
        serde_json::from_str(text).map_err(|e| SupervisorError::Decode(e.to_string()))?;

    match decoded.error {
        Some(error) if !error.is_null() => Err(SupervisorError::Service(error.to_string())),
        _ => Ok(decoded.output),
    }
}

#[async_trait]
impl CompletionClient for ResponsesClient {
    async fn submit(&self, payload: &RequestPayload) -> CompletionResult {
        tracing::debug!(
            endpoint = %self.config.endpoint(),
            model = payload.model(),
            items = payload.len(),
            "Sending request to completion service"
        );

        match self.post(payload).await {
            Ok(output) => CompletionResult::from_output(output),
            Err(e) => {
                tracing::warn!(error = %e, "Completion request failed");
                CompletionResult::Error(e)
            }
        }
    }

    fn name(&self) -> &str {
        "responses"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use supervisor_core::message::Role;
    use supervisor_core::tool::{ParameterSchema, ToolSchema};

    fn payload() -> RequestPayload {
        let declaration = ToolSchema {
            name: "findNearestStore".into(),
            description: "Nearest warehouse".into(),
            parameters: vec![ParameterSchema::required_string("zip_code", "Zip code")],
        }
        .declaration();

        let mut payload = RequestPayload::new("gpt-4.1", vec![declaration]);
        payload.push_message(Role::System, "rules");
        payload.push_message(Role::User, "history");
        payload
    }

    #[test]
    fn test_config_defaults() {
        let config = ResponsesConfig::default();
        assert_eq!(config.endpoint(), "https://api.openai.com/v1/responses");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_endpoint_joins_slashes() {
        let config = ResponsesConfig {
            base_url: "http://localhost:8080/".into(),
            api_path: "api/responses".into(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "http://localhost:8080/api/responses");
    }

    #[test]
    fn test_request_disables_parallel_tool_calls() {
        let payload = payload();
        let body = serde_json::to_value(ResponsesRequest::from_payload(&payload)).unwrap();

        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["parallel_tool_calls"], json!(false));
        assert_eq!(body["input"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["input"][0],
            json!({"type": "message", "role": "system", "content": "rules"})
        );
        assert_eq!(body["tools"][0]["name"], "findNearestStore");
        assert_eq!(body["tools"][0]["parameters"]["additionalProperties"], json!(false));
    }

    #[test]
    fn test_decode_function_calls() {
        let text = json!({
            "id": "resp_1",
            "output": [{
                "type": "function_call",
                "id": "fc_1",
                "call_id": "call_1",
                "name": "findNearestStore",
                "arguments": "{\"zip_code\":\"100000\"}",
                "status": "completed"
            }]
        })
        .to_string();

        let output = decode_response(&text).unwrap();
        assert!(matches!(
            CompletionResult::from_output(output),
            CompletionResult::ToolInvocations(calls) if calls[0].call_id == "call_1"
        ));
    }

    #[test]
    fn test_decode_service_error() {
        let text = json!({"error": {"message": "model overloaded"}, "output": []}).to_string();
        assert!(matches!(decode_response(&text), Err(SupervisorError::Service(_))));

        let ok = json!({"error": null, "output": []}).to_string();
        assert!(decode_response(&ok).unwrap().is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode_response("<html>"), Err(SupervisorError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error_sentinel() {
        let client = ResponsesClient::from_config(ResponsesConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let payload = payload();
        let result = client.submit(&payload).await;

        assert!(matches!(result, CompletionResult::Error(SupervisorError::Transport(_))));
        assert_eq!(payload.len(), 2);
    }
}
