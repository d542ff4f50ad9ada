use crate::error::{Result, SummitError};
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn check_response_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            error = %error_text,
            "API request failed"
        );
        return Err(SummitError::Api(format!(
            "API request failed with status {}: {}",
            status, error_text
        )));
    }
    Ok(response)
}

/// Join a base URL and an endpoint name, tolerating trailing slashes on the base.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:8000/api/v1", "chat"),
            "http://localhost:8000/api/v1/chat"
        );
        assert_eq!(
            endpoint_url("http://localhost:8000/api/v1//", "summarize"),
            "http://localhost:8000/api/v1/summarize"
        );
    }
}
