use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::{event, Level};
use url::Url;

use crate::auth::{ProviderError, TokenEndpoint};
use crate::core::types::{AuthCode, ClientCredentials};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_url: Url,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.api_url.as_str().trim_end_matches('/'))
    }

    pub fn http_client(&self) -> Result<reqwest::Client, ProviderError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }
}

async fn read_token_payload(
    response: reqwest::Response,
) -> Result<serde_json::Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        event!(Level::WARN, status = status.as_u16(), body = %body, "Token endpoint returned an error");
        return Err(ProviderError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// The provider's authorization-code flow helper: client credentials travel
/// in the form body next to the code.
#[derive(Debug, Clone)]
pub struct FlowHelper {
    client: reqwest::Client,
    token_url: String,
}

impl FlowHelper {
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            token_url: config.token_url(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for FlowHelper {
    fn name(&self) -> &'static str {
        "flow-helper"
    }

    async fn request_token(
        &self,
        credentials: &ClientCredentials,
        code: &AuthCode,
    ) -> Result<serde_json::Value, ProviderError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_ref()),
                ("client_id", credentials.client_id.as_ref()),
                ("client_secret", credentials.client_secret.as_ref()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        read_token_payload(response).await
    }
}

/// Direct call to the token endpoint authenticating with HTTP Basic.
#[derive(Debug, Clone)]
pub struct BasicAuthEndpoint {
    client: reqwest::Client,
    token_url: String,
}

impl BasicAuthEndpoint {
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            token_url: config.token_url(),
        }
    }
}

pub fn basic_authorization(credentials: &ClientCredentials) -> String {
    let pair = format!(
        "{}:{}",
        credentials.client_id.as_ref(),
        credentials.client_secret.as_ref()
    );
    format!("Basic {}", STANDARD.encode(pair))
}

#[async_trait]
impl TokenEndpoint for BasicAuthEndpoint {
    fn name(&self) -> &'static str {
        "basic-auth"
    }

    async fn request_token(
        &self,
        credentials: &ClientCredentials,
        code: &AuthCode,
    ) -> Result<serde_json::Value, ProviderError> {
        let mut authorization = HeaderValue::from_str(&basic_authorization(credentials))
            .map_err(|_| ProviderError::Transport("unencodable client credentials".to_string()))?;
        authorization.set_sensitive(true);

        let response = self
            .client
            .post(&self.token_url)
            .header(AUTHORIZATION, authorization)
            .form(&[("grant_type", "authorization_code"), ("code", code.as_ref())])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        read_token_payload(response).await
    }
}
