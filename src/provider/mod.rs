use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{event, Level};

use crate::auth::{
    AccessTokenResponse, CallbackOutcome, CallbackRequest, ExchangeError, Frontends, Redirect,
    TokenRequest, MISSING_CODE_DESCRIPTION,
};
use crate::core::types::ClientCredentials;

pub mod client;
pub mod exchange;

pub use client::{BasicAuthEndpoint, FlowHelper, ProviderConfig};
pub use exchange::{exchange, TokenExchanger};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnvPresence {
    #[serde(rename = "PAYMAN_CLIENT_ID")]
    pub client_id: String,
    #[serde(rename = "PAYMAN_CLIENT_SECRET")]
    pub client_secret: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthInfo {
    pub status: String,
    pub timestamp: String,
    pub env: EnvPresence,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub timestamp: String,
    pub endpoints: Vec<String>,
}

fn presence(present: bool) -> String {
    let label = if present { "Present" } else { "Missing" };
    label.to_string()
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Brokers authorization codes between the frontend and the provider.
#[derive(Debug)]
pub struct OAuth2Broker {
    exchanger: TokenExchanger,
    frontends: Frontends,
    client_id_present: bool,
    client_secret_present: bool,
}

impl OAuth2Broker {
    pub fn new(exchanger: TokenExchanger, frontends: Frontends) -> Self {
        let configured = exchanger.credentials().is_some();
        Self {
            exchanger,
            frontends,
            client_id_present: configured,
            client_secret_present: configured,
        }
    }

    /// Builds the broker against the live provider using both transport
    /// paths over one HTTP client.
    pub fn connect(
        client_id: Option<String>,
        client_secret: Option<String>,
        provider: &ProviderConfig,
        frontends: Frontends,
    ) -> Result<Self, ExchangeError> {
        let client_id_present = client_id.as_deref().map_or(false, |s| !s.trim().is_empty());
        let client_secret_present = client_secret
            .as_deref()
            .map_or(false, |s| !s.trim().is_empty());

        let credentials = ClientCredentials::from_parts(client_id, client_secret);
        if credentials.is_none() {
            event!(
                Level::WARN,
                "OAuth client credentials are incomplete; token exchange will fail"
            );
        }

        let http = provider.http_client()?;
        let primary = Arc::new(FlowHelper::new(http.clone(), provider));
        let fallback = Arc::new(BasicAuthEndpoint::new(http, provider));
        let exchanger = TokenExchanger::new(credentials, primary, fallback);

        Ok(Self {
            exchanger,
            frontends,
            client_id_present,
            client_secret_present,
        })
    }

    pub fn frontends(&self) -> &Frontends {
        &self.frontends
    }

    #[tracing::instrument(skip_all)]
    pub async fn token_request(
        &self,
        req: TokenRequest,
    ) -> Result<AccessTokenResponse, ExchangeError> {
        event!(Level::TRACE, "Handling token request");
        self.exchanger.exchange(req.code.as_deref()).await.map_err(|e| {
            event!(Level::ERROR, error = ?e, "Token exchange failed");
            e
        })
    }

    /// Always produces a redirect; failures travel to the frontend in the
    /// query string.
    #[tracing::instrument(skip_all, fields(state_present = req.state.is_some()))]
    pub async fn callback_request(&self, req: CallbackRequest, referer: Option<&str>) -> Redirect {
        let target = self.frontends.select(referer);
        event!(Level::DEBUG, target = %target.0, "Handling OAuth callback");

        match req.outcome() {
            CallbackOutcome::Denied { error, description } => {
                event!(Level::WARN, %error, %description, "Provider reported an OAuth error");
                Redirect::error(target, &error, &description)
            }
            CallbackOutcome::MissingCode => {
                event!(Level::WARN, "Callback arrived without an authorization code");
                Redirect::error(target, "missing_code", MISSING_CODE_DESCRIPTION)
            }
            CallbackOutcome::Exchange(code) => {
                match self.exchanger.exchange(Some(code.as_ref())).await {
                    Ok(token) => Redirect::token(target, &token),
                    Err(e) => {
                        event!(Level::ERROR, error = ?e, "Callback token exchange failed");
                        Redirect::error(target, "token_exchange_failed", &e.public_message())
                    }
                }
            }
        }
    }

    pub fn health(&self) -> HealthInfo {
        HealthInfo {
            status: "ok".to_string(),
            timestamp: timestamp(),
            env: EnvPresence {
                client_id: presence(self.client_id_present),
                client_secret: presence(self.client_secret_present),
            },
        }
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            message: "AutoCart Backend API".to_string(),
            status: "running".to_string(),
            timestamp: timestamp(),
            endpoints: vec![
                "GET /health - Health check".to_string(),
                "POST /api/oauth/token - Exchange OAuth code for token".to_string(),
                "GET /api/oauth/callback - OAuth callback handler".to_string(),
            ],
        }
    }
}
