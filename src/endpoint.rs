//! Client for the remote message endpoint.
//!
//! The endpoint takes one form field, `message`, and answers with a JSON
//! object whose `message` string is the assistant's reply. Anything else is a
//! failure; the caller decides what to show for it. No retries happen here.

use crate::error::{EndpointError, FailureReason};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Settled result of one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered(String),
    Failed(FailureReason),
}

/// Anything that can turn user text into an assistant reply.
///
/// `send` resolves exactly once and must not block the caller.
pub trait MessageEndpoint: Send + Sync + 'static {
    fn send(&self, text: String) -> impl Future<Output = Outcome> + Send;
}

#[derive(Deserialize)]
struct MessageReply {
    #[serde(default)]
    message: Option<String>,
}

/// Form-posting HTTP implementation
#[derive(Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EndpointError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `message=<text>` and extract the reply text
    pub async fn post_message(&self, text: &str) -> Result<String, EndpointError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("message", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Status(status));
        }

        let body = response.bytes().await?;
        let reply: MessageReply =
            serde_json::from_slice(&body).map_err(|e| EndpointError::Malformed(e.to_string()))?;

        match reply.message {
            Some(message) if !message.is_empty() => Ok(message),
            _ => Err(EndpointError::Malformed("no `message` field in response".to_string())),
        }
    }
}

impl MessageEndpoint for HttpEndpoint {
    async fn send(&self, text: String) -> Outcome {
        debug!(url = %self.url, chars = text.chars().count(), "posting message");
        match self.post_message(&text).await {
            Ok(reply) => Outcome::Delivered(reply),
            Err(err) => {
                warn!(reason = %err.reason(), error = %err, "message endpoint failed");
                Outcome::Failed(err.reason())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn endpoint_for(server: &MockServer) -> HttpEndpoint {
        HttpEndpoint::new(format!("{}/api/message/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_delivers_message_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/message/"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("message=hi+there"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Hello!"})))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = endpoint_for(&server).await;
        let outcome = endpoint.send("hi there".to_string()).await;

        assert_eq!(outcome, Outcome::Delivered("Hello!".to_string()));
    }

    #[tokio::test]
    async fn test_form_body_escapes_reserved_characters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string("message=a%26b%3Dc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = endpoint_for(&server).await;
        assert_eq!(endpoint.send("a&b=c".to_string()).await, Outcome::Delivered("ok".to_string()));
    }

    #[tokio::test]
    async fn test_empty_object_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let endpoint = endpoint_for(&server).await;
        assert_eq!(
            endpoint.send("hello".to_string()).await,
            Outcome::Failed(FailureReason::MalformedResponse)
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": ""})))
            .mount(&server)
            .await;

        let endpoint = endpoint_for(&server).await;
        assert_eq!(
            endpoint.send("hello".to_string()).await,
            Outcome::Failed(FailureReason::MalformedResponse)
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let endpoint = endpoint_for(&server).await;
        let err = endpoint.post_message("hello").await.unwrap_err();
        assert!(matches!(err, EndpointError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({"message": "ignored"})))
            .mount(&server)
            .await;

        let endpoint = endpoint_for(&server).await;
        let err = endpoint.post_message("hello").await.unwrap_err();
        assert!(matches!(err, EndpointError::Status(status) if status.as_u16() == 500));
        assert_eq!(err.reason(), FailureReason::TransportFailure);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let endpoint = HttpEndpoint::new("http://127.0.0.1:1/api/message/", Duration::from_secs(2)).unwrap();
        assert_eq!(
            endpoint.send("hello".to_string()).await,
            Outcome::Failed(FailureReason::TransportFailure)
        );
    }
}
