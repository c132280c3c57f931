//! HTTP client for the registration API
//!
//! Posts form payloads as JSON and interprets the answer: `201 Created` is
//! the only success; anything else is a rejection carrying whatever message
//! the server put in its error body.

use super::traits::RegistrationClient;
use crate::error::SubmitError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Client for communicating with the registration API
#[derive(Debug, Clone)]
pub struct HttpRegistrationClient {
    client: Client,
    base_url: String,
}

impl HttpRegistrationClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:5000`)
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client that reuses an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl RegistrationClient for HttpRegistrationClient {
    async fn register(&self, endpoint: &str, payload: &Value) -> Result<(), SubmitError> {
        let url = self.url_for(endpoint);
        tracing::debug!("POST {url}");

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();

        if status == StatusCode::CREATED {
            return Ok(());
        }

        // A body we cannot read or parse still counts as a rejection
        let message = match response.text().await {
            Ok(body) => extract_error_message(&body),
            Err(err) => {
                tracing::debug!("failed to read error body from {url}: {err}");
                None
            }
        };

        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message`, then `error` (string), then `error.message`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let candidate = value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })?;

    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    mod extract_error_message {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_top_level_message() {
            assert_eq!(
                extract_error_message(r#"{"message": "Bed already taken"}"#),
                Some("Bed already taken".to_string())
            );
        }

        #[test]
        fn test_error_string() {
            assert_eq!(
                extract_error_message(r#"{"error": "Duplicate student ID"}"#),
                Some("Duplicate student ID".to_string())
            );
        }

        #[test]
        fn test_nested_error_message() {
            assert_eq!(
                extract_error_message(r#"{"error": {"message": "Closed"}}"#),
                Some("Closed".to_string())
            );
        }

        #[test]
        fn test_unusable_bodies() {
            assert_eq!(extract_error_message("<html>502</html>"), None);
            assert_eq!(extract_error_message(r#"{"message": 42}"#), None);
            assert_eq!(extract_error_message(r#"{"message": "  "}"#), None);
            assert_eq!(extract_error_message(""), None);
        }
    }

    #[test]
    fn test_url_joining() {
        let client = HttpRegistrationClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url_for("/api/dormitory/register"),
            "http://localhost:5000/api/dormitory/register"
        );
        assert_eq!(
            client.url_for("api/x"),
            "http://localhost:5000/api/x"
        );
    }

    mod http {
        use super::*;
        use pretty_assertions::assert_eq;
        use mockito::{Matcher, Server};

        #[tokio::test]
        async fn test_created_is_success() {
            let mut server = Server::new_async().await;
            let mock = server
                .mock("POST", "/api/dormitory/register")
                .match_body(Matcher::PartialJson(json!({"fullName": "Alice"})))
                .with_status(201)
                .with_body(r#"{"id": 7}"#)
                .create_async()
                .await;

            let client = HttpRegistrationClient::new(&server.url());
            let result = client
                .register("/api/dormitory/register", &json!({"fullName": "Alice"}))
                .await;

            assert!(result.is_ok());
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn test_ok_without_created_is_rejected() {
            let mut server = Server::new_async().await;
            let _mock = server
                .mock("POST", "/register")
                .with_status(200)
                .with_body("{}")
                .create_async()
                .await;

            let client = HttpRegistrationClient::new(&server.url());
            let err = client.register("/register", &json!({})).await.unwrap_err();

            assert!(matches!(
                err,
                SubmitError::Rejected {
                    status: 200,
                    message: None
                }
            ));
        }

        #[tokio::test]
        async fn test_conflict_carries_server_message() {
            let mut server = Server::new_async().await;
            let _mock = server
                .mock("POST", "/register")
                .with_status(409)
                .with_header("content-type", "application/json")
                .with_body(r#"{"message": "Bed already taken"}"#)
                .create_async()
                .await;

            let client = HttpRegistrationClient::new(&server.url());
            let err = client.register("/register", &json!({})).await.unwrap_err();

            assert_eq!(err.server_message(), Some("Bed already taken"));
        }

        #[tokio::test]
        async fn test_unreachable_server_is_transport_error() {
            // Port 9 (discard) on localhost is closed in test environments
            let client = HttpRegistrationClient::new("http://127.0.0.1:9");
            let err = client.register("/register", &json!({})).await.unwrap_err();
            assert!(matches!(err, SubmitError::Transport(_)));
        }
    }
}
