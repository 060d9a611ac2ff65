use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// `timeout` bounds the whole request, connect through body read.
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [
                { "parts": [{ "text": prompt }] }
            ],
        })
    }

    fn extract_text(resp: &serde_json::Value) -> Result<String, LlmError> {
        resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::ParseError("missing candidates[0].content.parts[0].text".into())
            })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = Self::build_request_body(prompt);

        debug!("Gemini request to model={}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status: status.as_u16(), body });
        }

        let resp: serde_json::Value = response.json().await?;
        Self::extract_text(&resp)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn provider(base_url: &str, timeout: Duration) -> GeminiProvider {
        GeminiProvider::new(
            "test-key".into(),
            "gemini-2.0-flash".into(),
            base_url.into(),
            timeout,
        )
        .unwrap()
    }

    fn candidate(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "parts": [{ "text": text }], "role": "model" } }
            ]
        })
    }

    #[test]
    fn test_request_body_structure() {
        let body = GeminiProvider::build_request_body("Explain osmosis");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["parts"][0]["text"], "Explain osmosis");
        // No role or generationConfig on the wire.
        assert!(contents[0].get("role").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let p = provider("http://localhost:9/", Duration::from_secs(1));
        assert_eq!(
            p.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text_missing_fields() {
        let err = GeminiProvider::extract_text(&json!({ "candidates": [] })).unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_complete_sends_key_header_and_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({ "contents": [{ "parts": [{ "text": "hi" }] }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("hello back")))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server.uri(), Duration::from_secs(5))
            .complete("hi")
            .await
            .unwrap();
        assert_eq!(text, "hello back");
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = provider(&server.uri(), Duration::from_secs(5))
            .complete("hi")
            .await
            .unwrap_err();
        match err {
            LlmError::ApiError { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server.uri(), Duration::from_secs(5))
            .complete("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::HttpError(_)));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate("too late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = provider(&server.uri(), Duration::from_millis(200))
            .complete("hi")
            .await
            .unwrap_err();
        match err {
            LlmError::HttpError(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
