use super::types::{HealthResponse, SummitRequest};
use super::utils::{self, HEALTH_TIMEOUT};
use crate::error::{Result, SummitError};
use crate::mode::Mode;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Delivers one request to the backend endpoint for `mode`.
///
/// Implementations return the reply body verbatim on a success status and an
/// error for network failures and non-success statuses. Exactly one request is
/// issued per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, mode: Mode, request: &SummitRequest) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| SummitError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SummitError::Config(format!(
                "Base URL must use http or https: {}",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SummitError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, mode: Mode) -> String {
        utils::endpoint_url(&self.base_url, mode.endpoint())
    }

    /// Check that the backend answers `GET /health` with status "ok".
    pub async fn check_health(&self) -> Result<()> {
        let url = utils::endpoint_url(&self.base_url, "health");

        let response = match tokio::time::timeout(HEALTH_TIMEOUT, self.client.get(&url).send()).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(SummitError::Api(format!(
                    "Health check timed out after {:?}",
                    HEALTH_TIMEOUT
                )))
            }
        };
        let response = utils::check_response_status(response).await?;
        let health: HealthResponse = response.json().await?;

        if health.status != "ok" {
            return Err(SummitError::Api(format!(
                "Backend reported status '{}'",
                health.status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, mode: Mode, request: &SummitRequest) -> Result<String> {
        let url = self.url_for(mode);
        tracing::debug!(url = %url, messages = request.content.len(), "Sending request");

        let response = self.client.post(&url).json(request).send().await?;
        let response = utils::check_response_status(response).await?;
        let body = response.text().await?;

        tracing::debug!(url = %url, bytes = body.len(), "Received reply");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::utils::REQUEST_TIMEOUT;
    use crate::api::types::WireMessage;
    use crate::error::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Whether `buf` holds a full request: headers plus `content-length` body bytes.
    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }

    /// Serve one HTTP exchange on an ephemeral port. Returns the base URL and
    /// a handle resolving to the raw request the server received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request_complete(&received) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).into_owned()
        });

        (format!("http://{}/api/v1", addr), handle)
    }

    #[test]
    fn test_client_creation() {
        let transport = HttpTransport::new("http://localhost:8000/api/v1", REQUEST_TIMEOUT);
        assert!(transport.is_ok());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpTransport::new("not a url", REQUEST_TIMEOUT).err().unwrap();
        assert!(matches!(err, SummitError::Config(_)));

        let err = HttpTransport::new("ftp://example.com", REQUEST_TIMEOUT)
            .err()
            .unwrap();
        assert!(matches!(err, SummitError::Config(_)));
    }

    #[test]
    fn test_urls_per_mode() {
        let transport = HttpTransport::new("http://localhost:8000/api/v1/", REQUEST_TIMEOUT).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            transport.url_for(Mode::Chat),
            "http://localhost:8000/api/v1/chat"
        );
        assert_eq!(
            transport.url_for(Mode::Summary),
            "http://localhost:8000/api/v1/summarize"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_failure() {
        let transport =
            HttpTransport::new("http://127.0.0.1:9/api/v1", Duration::from_secs(2)).unwrap();
        let request = SummitRequest {
            content: vec![],
            respond_in_language: None,
        };

        let err = transport.send(Mode::Chat, &request).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::TransportFailure);
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", r#"{"detail":"model overloaded"}"#).await;
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let request = SummitRequest {
            content: vec![WireMessage::user("hello")],
            respond_in_language: None,
        };

        let err = transport.send(Mode::Chat, &request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        let message = err.to_string();
        assert!(message.contains("500"), "{}", message);
        assert!(message.contains("model overloaded"), "{}", message);

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /api/v1/chat "), "{}", received);
    }

    #[tokio::test]
    async fn test_summary_request_reaches_summarize_endpoint() {
        let reply = r#"{"summary":"Short.","model":"m1","execution_time":0.4,"usage":{"prompt_tokens":7,"completion_tokens":2,"total_tokens":9}}"#;
        let (base_url, server) = serve_once("200 OK", reply).await;
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let request = SummitRequest {
            content: vec![WireMessage::user("A long article.\n\nSecond paragraph.")],
            respond_in_language: Some("fr".to_string()),
        };

        let body = transport.send(Mode::Summary, &request).await.unwrap();
        assert_eq!(body, reply);

        let received = server.await.unwrap();
        assert!(
            received.starts_with("POST /api/v1/summarize HTTP/1.1\r\n"),
            "{}",
            received
        );
        let (_, sent_body) = received.split_once("\r\n\r\n").unwrap();
        let sent: serde_json::Value = serde_json::from_str(sent_body).unwrap();
        assert_eq!(sent["respondInLanguage"], "fr");
        assert_eq!(sent["content"][0]["role"], "user");
        assert_eq!(
            sent["content"][0]["content"],
            "A long article.\n\nSecond paragraph."
        );
    }

    #[tokio::test]
    async fn test_language_key_sent_as_null_when_unset() {
        let (base_url, server) = serve_once("200 OK", r#"{"response":"hi"}"#).await;
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let request = SummitRequest {
            content: vec![WireMessage::user("hi")],
            respond_in_language: None,
        };

        transport.send(Mode::Chat, &request).await.unwrap();

        let received = server.await.unwrap();
        let (_, sent_body) = received.split_once("\r\n\r\n").unwrap();
        let sent: serde_json::Value = serde_json::from_str(sent_body).unwrap();
        assert!(sent.as_object().unwrap().contains_key("respondInLanguage"));
        assert!(sent["respondInLanguage"].is_null());
    }

    #[tokio::test]
    async fn test_health_check_against_live_listener() {
        let (base_url, server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();

        transport.check_health().await.unwrap();

        let received = server.await.unwrap();
        assert!(received.starts_with("GET /api/v1/health "), "{}", received);
    }
}
