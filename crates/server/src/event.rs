//! Invocation envelope types (API-Gateway proxy shape) and response builders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Incoming HTTP-style event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
    #[serde(default)]
    pub body: Option<String>,
}

impl InvocationEvent {
    /// A POST event carrying a plain JSON body.
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: Some("POST".into()),
            is_base64_encoded: Some(false),
            body: Some(body.into()),
        }
    }

    pub fn is_preflight(&self) -> bool {
        self.http_method
            .as_deref()
            .is_some_and(|m| m == "OPTIONS")
    }
}

/// Outgoing response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InvocationResponse {
    fn new(status_code: u16, headers: BTreeMap<String, String>, body: String) -> Self {
        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// 200 with CORS headers and an empty body.
    pub fn preflight() -> Self {
        Self::new(200, cors_headers(), String::new())
    }

    /// 200 JSON response with CORS headers.
    pub fn ok_json(body: String) -> Self {
        let mut headers = cors_headers();
        headers.insert(CONTENT_TYPE.into(), "application/json".into());
        Self::new(200, headers, body)
    }

    /// Error response carrying only the allow-origin header.
    pub fn error(status_code: u16, message: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(ALLOW_ORIGIN.into(), "*".into());
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status_code, headers, body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (ALLOW_ORIGIN.to_string(), "*".to_string()),
        (ALLOW_METHODS.to_string(), "OPTIONS,POST".to_string()),
        (ALLOW_HEADERS.to_string(), "Content-Type".to_string()),
    ])
}

/// JSON body of a question request. Fields are optional so that missing
/// ones surface as a 400 rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QaRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    /// Base64-encoded file bytes.
    #[serde(default)]
    pub filecontent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QaResponse {
    pub filename: String,
    pub query: String,
    pub answer: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_deserializes_camel_case() {
        let event: InvocationEvent = serde_json::from_str(
            r#"{"httpMethod":"POST","isBase64Encoded":true,"body":"e30=","headers":{"x":"y"}}"#,
        )
        .unwrap();
        assert_eq!(event.http_method.as_deref(), Some("POST"));
        assert_eq!(event.is_base64_encoded, Some(true));
        assert_eq!(event.body.as_deref(), Some("e30="));
    }

    #[test]
    fn event_tolerates_missing_fields() {
        let event: InvocationEvent = serde_json::from_str("{}").unwrap();
        assert!(event.body.is_none());
        assert!(!event.is_preflight());
    }

    #[test]
    fn preflight_method_match_is_exact() {
        let method = |m: &str| InvocationEvent {
            http_method: Some(m.into()),
            ..Default::default()
        };
        assert!(method("OPTIONS").is_preflight());
        assert!(!method("options").is_preflight());
        assert!(!method("POST").is_preflight());
    }

    #[test]
    fn response_serializes_status_code_key() {
        let json = serde_json::to_value(InvocationResponse::preflight()).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "");
        assert_eq!(json["headers"][ALLOW_METHODS], "OPTIONS,POST");
    }

    #[test]
    fn error_response_has_only_origin_header() {
        let resp = InvocationResponse::error(400, "Invalid base64 file");
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.header(ALLOW_ORIGIN), Some("*"));
        assert_eq!(resp.body, r#"{"error":"Invalid base64 file"}"#);
    }

    #[test]
    fn ok_response_has_content_type_and_cors() {
        let resp = InvocationResponse::ok_json("{}".into());
        assert_eq!(resp.header(CONTENT_TYPE), Some("application/json"));
        assert_eq!(resp.header(ALLOW_HEADERS), Some("Content-Type"));
        assert_eq!(resp.headers.len(), 4);
    }
}
