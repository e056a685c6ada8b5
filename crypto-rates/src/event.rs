//! Request and response descriptors in the hosting platform's JSON shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CORS_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const CORS_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const CORS_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const CORS_MAX_AGE: &str = "Access-Control-Max-Age";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CACHE_CONTROL: &str = "Cache-Control";

/// Inbound invocation. Fields other than these are ignored.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl HttpEvent {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            query_string_parameters: None,
        }
    }
}

impl Default for HttpEvent {
    fn default() -> Self {
        Self::new(default_method())
    }
}

/// Outbound result handed back to the platform.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Error body: `{"error": ..., "details": ...}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpResponse {
    /// CORS preflight answer: 200, empty body.
    pub fn preflight() -> Self {
        let headers = [
            (CORS_ALLOW_ORIGIN, "*"),
            (CORS_ALLOW_METHODS, "GET, OPTIONS"),
            (CORS_ALLOW_HEADERS, "Content-Type"),
            (CORS_MAX_AGE, "86400"),
        ];

        Self {
            status_code: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    /// JSON answer with the allow-origin header.
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        headers.insert(CORS_ALLOW_ORIGIN.to_string(), "*".to_string());

        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    pub fn error(status_code: u16, error: &str, details: Option<String>) -> Self {
        Self::json(
            status_code,
            &ErrorBody {
                error: error.to_string(),
                details,
            },
        )
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_from_platform_json() {
        let event: HttpEvent = serde_json::from_value(json!({
            "httpMethod": "OPTIONS",
            "queryStringParameters": {"foo": "bar"},
            "headers": {"Origin": "https://example.com"},
            "body": "",
            "isBase64Encoded": false
        }))
        .unwrap();

        assert_eq!(event.http_method, "OPTIONS");
        assert_eq!(
            event.query_string_parameters.unwrap().get("foo").map(String::as_str),
            Some("bar")
        );
    }

    #[test]
    fn test_event_defaults() {
        let event: HttpEvent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(event, HttpEvent::default());
        assert_eq!(event.http_method, "GET");

        let event: HttpEvent =
            serde_json::from_value(json!({"httpMethod": "GET", "queryStringParameters": null})).unwrap();
        assert!(event.query_string_parameters.is_none());
    }

    #[test]
    fn test_response_field_names() {
        let value = serde_json::to_value(HttpResponse::preflight()).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["body"], "");
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(value["headers"]["Access-Control-Max-Age"], "86400");
    }

    #[test]
    fn test_error_body_skips_missing_details() {
        let resp = HttpResponse::error(405, "Method not allowed", None);
        assert_eq!(resp.body, r#"{"error":"Method not allowed"}"#);
        assert_eq!(resp.headers.get(CONTENT_TYPE).map(String::as_str), Some("application/json"));

        let resp = HttpResponse::error(503, "API unavailable", Some("timed out".to_string()));
        assert_eq!(resp.body, r#"{"error":"API unavailable","details":"timed out"}"#);
    }
}
