use std::sync::Arc;

use tracing::{event, Level};

use crate::auth::{normalize, AccessTokenResponse, ExchangeError, TokenEndpoint};
use crate::core::types::{AuthCode, ClientCredentials};
use crate::util::redact::Redacted;

/// Trade an authorization code for an access token.
///
/// Nothing touches the network until the code and the credentials have both
/// been checked. A failure on the primary path falls through to `fallback`;
/// the fallback's failure is final.
pub async fn exchange(
    primary: &dyn TokenEndpoint,
    fallback: &dyn TokenEndpoint,
    credentials: Option<&ClientCredentials>,
    code: Option<&str>,
) -> Result<AccessTokenResponse, ExchangeError> {
    let code = AuthCode::from_input(code).ok_or(ExchangeError::MissingCode)?;
    let credentials = credentials.ok_or(ExchangeError::Configuration)?;

    event!(Level::DEBUG, code = %Redacted(code.as_ref()), via = primary.name(), "Exchanging authorization code");

    let payload = match primary.request_token(credentials, &code).await {
        Ok(payload) => payload,
        Err(e) => {
            event!(Level::WARN, error = %e, via = fallback.name(), "Primary token exchange failed, falling back");
            fallback.request_token(credentials, &code).await?
        }
    };

    let token = normalize(&payload).map_err(|e| {
        if let ExchangeError::MissingToken { fields } = &e {
            event!(Level::ERROR, ?fields, "No access token in provider response");
        }
        e
    })?;

    event!(Level::INFO, expires_in = token.expires_in, "Token exchange successful");
    Ok(token)
}

/// Process-wide credentials bundled with the two transport paths.
#[derive(Clone)]
pub struct TokenExchanger {
    credentials: Option<ClientCredentials>,
    primary: Arc<dyn TokenEndpoint>,
    fallback: Arc<dyn TokenEndpoint>,
}

impl std::fmt::Debug for TokenExchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenExchanger")
            .field("credentials", &self.credentials)
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl TokenExchanger {
    pub fn new(
        credentials: Option<ClientCredentials>,
        primary: Arc<dyn TokenEndpoint>,
        fallback: Arc<dyn TokenEndpoint>,
    ) -> Self {
        Self {
            credentials,
            primary,
            fallback,
        }
    }

    pub fn credentials(&self) -> Option<&ClientCredentials> {
        self.credentials.as_ref()
    }

    pub async fn exchange(&self, code: Option<&str>) -> Result<AccessTokenResponse, ExchangeError> {
        exchange(
            self.primary.as_ref(),
            self.fallback.as_ref(),
            self.credentials.as_ref(),
            code,
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::ProviderError;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned token endpoint that counts how often it was asked.
    pub struct StubEndpoint {
        reply: Result<Value, ProviderError>,
        pub calls: AtomicUsize,
    }

    impl StubEndpoint {
        pub fn ok(payload: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(payload),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(ProviderError::Rejected {
                    status,
                    body: "{\"error\":\"invalid_grant\"}".to_string(),
                }),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenEndpoint for StubEndpoint {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn request_token(
            &self,
            _credentials: &ClientCredentials,
            _code: &AuthCode,
        ) -> Result<Value, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    pub fn credentials() -> ClientCredentials {
        ClientCredentials::from_parts(Some("client".into()), Some("secret".into())).unwrap()
    }

    #[tokio::test]
    async fn missing_code_never_calls_out() {
        let primary = StubEndpoint::ok(json!({"access_token": "tok"}));
        let fallback = StubEndpoint::ok(json!({"access_token": "tok"}));
        let creds = credentials();

        for code in [None, Some(""), Some("  ")].iter() {
            let result = exchange(primary.as_ref(), fallback.as_ref(), Some(&creds), *code).await;
            assert!(matches!(result, Err(ExchangeError::MissingCode)));
        }
        assert_eq!(primary.calls() + fallback.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credentials_never_call_out() {
        let primary = StubEndpoint::ok(json!({"access_token": "tok"}));
        let fallback = StubEndpoint::ok(json!({"access_token": "tok"}));

        let result = exchange(primary.as_ref(), fallback.as_ref(), None, Some("abc")).await;
        assert!(matches!(result, Err(ExchangeError::Configuration)));
        assert_eq!(primary.calls() + fallback.calls(), 0);
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = StubEndpoint::ok(json!({"accessToken": "tok", "expiresIn": 60}));
        let fallback = StubEndpoint::ok(json!({"access_token": "other"}));
        let creds = credentials();

        let token = exchange(primary.as_ref(), fallback.as_ref(), Some(&creds), Some("abc"))
            .await
            .unwrap();
        assert_eq!(token.access_token, "tok");
        assert_eq!(token.expires_in, 60);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back() {
        let primary = StubEndpoint::failing(401);
        let fallback = StubEndpoint::ok(json!({"token": "tok", "expiry": 10}));
        let creds = credentials();

        let token = exchange(primary.as_ref(), fallback.as_ref(), Some(&creds), Some("abc"))
            .await
            .unwrap();
        assert_eq!(token.access_token, "tok");
        assert_eq!(token.expires_in, 10);
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn fallback_failure_is_a_provider_error() {
        let primary = StubEndpoint::failing(401);
        let fallback = StubEndpoint::failing(400);
        let creds = credentials();

        let result = exchange(primary.as_ref(), fallback.as_ref(), Some(&creds), Some("abc")).await;
        match result {
            Err(ExchangeError::Provider(ProviderError::Rejected { status, body })) => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unrecognized_payload_is_missing_token() {
        let primary = StubEndpoint::ok(json!({"foo": "bar"}));
        let fallback = StubEndpoint::ok(json!({"access_token": "tok"}));
        let exchanger = TokenExchanger::new(Some(credentials()), primary.clone(), fallback.clone());

        match exchanger.exchange(Some("abc")).await {
            Err(ExchangeError::MissingToken { fields }) => {
                assert_eq!(fields, vec!["foo".to_string()])
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fallback.calls(), 0);
    }
}
