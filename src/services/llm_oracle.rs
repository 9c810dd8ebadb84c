use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::OracleError;
use crate::core::oracle::{OracleProposal, OracleRequest, SelectionOracle};

const SYSTEM_PROMPT: &str = "\
You select vendors for customer service requests on a home-services marketplace.

Weigh these factors:
1. Fit between the requested service and the vendor
2. Distance to the customer
3. Performance history and ratings
4. Current workload and availability
5. Typical response time
6. Priority of the request
7. Fair opportunity for newer vendors

Urgent requests favour vendors that are online, idle and close by. Other requests
balance performance against giving newer vendors work.

Only choose vendor_id values from the candidate list. Answer with a JSON object:
{\"selected_vendors\": [ids], \"primary_vendor\": id, \"fallback_vendors\": [ids],
 \"selection_reasoning\": text, \"confidence_score\": number between 0 and 1}";

/// Ranking oracle backed by an OpenAI-compatible chat completions API
///
/// Sends the candidate shortlist as JSON and expects the proposal back as a
/// JSON object in the first choice's message content.
pub struct LlmOracle {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl LlmOracle {
    /// Create a new oracle client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        if api_key.is_empty() {
            return Err(OracleError::Configuration("oracle API key is not set".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key,
            model,
            timeout,
            client,
        })
    }

    fn chat_request(&self, request: &OracleRequest) -> Result<ChatRequest<'_>, OracleError> {
        let payload = serde_json::to_string_pretty(request)
            .map_err(|e| OracleError::Configuration(format!("Failed to encode payload: {}", e)))?;

        Ok(ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Select the best vendors for this service request: {}", payload),
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat { kind: "json_object" },
        })
    }
}

/// Decode the proposal carried in a chat completion body
fn parse_proposal(body: ChatResponse) -> Result<OracleProposal, OracleError> {
    let content = body
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| OracleError::InvalidResponse("Missing choices array".into()))?;

    serde_json::from_str(content.trim())
        .map_err(|e| OracleError::InvalidResponse(format!("Failed to parse proposal: {}", e)))
}

#[async_trait]
impl SelectionOracle for LlmOracle {
    fn name(&self) -> &str {
        &self.model
    }

    async fn propose(&self, request: &OracleRequest) -> Result<OracleProposal, OracleError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.chat_request(request)?;

        tracing::debug!("Requesting proposal from: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::timeout(self.timeout)
                } else {
                    OracleError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OracleError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            OracleError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        parse_proposal(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, ServiceCategory};
    use serde_json::json;

    fn oracle_request() -> OracleRequest {
        OracleRequest {
            available_vendors: vec![],
            priority: Priority::High,
            service_type: ServiceCategory::Electrical,
            estimated_value: 180.0,
        }
    }

    fn completion_body(content: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    fn oracle(url: String) -> LlmOracle {
        LlmOracle::new(url, "test-key".into(), "gpt-4".into(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let result = LlmOracle::new(
            "http://localhost".into(),
            String::new(),
            "gpt-4".into(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(OracleError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_parses_proposal() {
        let mut server = mockito::Server::new_async().await;
        let content = json!({
            "selected_vendors": ["v1", "v2"],
            "primary_vendor": "v1",
            "fallback_vendors": ["v3"],
            "selection_reasoning": "v1 is closest",
            "confidence_score": 0.8
        })
        .to_string();

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(&content))
            .create_async()
            .await;

        let proposal = oracle(server.url()).propose(&oracle_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(proposal.selected_vendors, vec!["v1", "v2"]);
        assert_eq!(proposal.primary_vendor, "v1");
        assert_eq!(proposal.confidence_score, 0.8);
    }

    #[tokio::test]
    async fn test_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = oracle(server.url()).propose(&oracle_request()).await.unwrap_err();
        assert_eq!(
            err,
            OracleError::Upstream {
                status: 429,
                message: "rate limited".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_partial_proposal_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        let content = json!({ "selected_vendors": ["v1"], "primary_vendor": "v1" }).to_string();
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(&content))
            .create_async()
            .await;

        let err = oracle(server.url()).propose(&oracle_request()).await.unwrap_err();
        assert!(matches!(err, OracleError::InvalidResponse(_)));
    }

    #[test]
    fn test_empty_choices_is_invalid() {
        let body = ChatResponse { choices: vec![] };
        assert!(matches!(parse_proposal(body), Err(OracleError::InvalidResponse(_))));
    }
}
