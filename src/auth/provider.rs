use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("identity provider rejected the credentials with status {0}")]
    Rejected(StatusCode),

    #[error("identity provider response violates contract: {0}")]
    Contract(String),
}

/// HTTP client for the external identity service's login endpoint
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    client: reqwest::Client,
    login_url: String,
}

impl IdentityProvider {
    /// The timeout bounds the whole exchange. Logins are never retried since
    /// a repeated POST may have side effects on the provider.
    pub fn new(login_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Unreachable)?;

        Ok(Self {
            client,
            login_url: login_url.into(),
        })
    }

    fn login_request(&self, username: &str, password: &str) -> reqwest::RequestBuilder {
        let request_id = Uuid::new_v4();
        debug!(%request_id, "Sending login request to identity provider");

        self.client
            .post(&self.login_url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .form(&[("username", username), ("password", password)])
    }

    /// Exchange credentials for the provider's access token.
    ///
    /// Only `200 OK` counts as success; the body is not read otherwise.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ProviderError> {
        let response = self
            .login_request(username, password)
            .send()
            .await
            .map_err(ProviderError::Unreachable)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::Rejected(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Contract(format!("response body is not JSON: {}", e)))?;

        body.get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Contract("missing access_token".to_string()))
    }
}
