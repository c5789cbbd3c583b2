use warp::http::StatusCode;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider rejected the token request with status {status}")]
    Rejected { status: u16, body: String },
    #[error("provider returned an unreadable token response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExchangeError {
    #[error("Missing code parameter")]
    MissingCode,
    #[error("Server is missing OAuth client configuration")]
    Configuration,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("No access token received from provider")]
    MissingToken { fields: Vec<String> },
    #[error("Token exchange failed")]
    Internal(String),
}

impl ExchangeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCode => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to hand to a browser. Provider bodies and
    /// transport details stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Provider(ProviderError::Rejected { status, .. }) => {
                format!("Token exchange rejected by provider (status {})", status)
            }
            Self::Provider(ProviderError::Transport(_)) => "Provider is unreachable".to_string(),
            Self::Provider(ProviderError::InvalidResponse(_)) => {
                "Provider returned an invalid token response".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_fields: Option<Vec<String>>,
}

impl From<&ExchangeError> for ErrorBody {
    fn from(e: &ExchangeError) -> Self {
        let received_fields = match e {
            ExchangeError::MissingToken { fields } => Some(fields.clone()),
            _ => None,
        };

        Self {
            error: e.public_message(),
            received_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_code_is_a_client_error() {
        assert_eq!(ExchangeError::MissingCode.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ExchangeError::Configuration.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ExchangeError::MissingToken { fields: vec![] }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_body_is_not_exposed() {
        let e = ExchangeError::from(ProviderError::Rejected {
            status: 400,
            body: r#"{"error":"invalid_grant","client_secret":"oops"}"#.to_string(),
        });
        let body = ErrorBody::from(&e);
        assert!(!body.error.contains("oops"));
        assert!(body.error.contains("400"));
        assert_eq!(body.received_fields, None);
    }

    #[test]
    fn configuration_error_does_not_name_a_credential() {
        let message = ExchangeError::Configuration.public_message();
        assert!(!message.contains("SECRET"));
        assert!(!message.contains("CLIENT_ID"));
    }

    #[test]
    fn missing_token_lists_fields() {
        let e = ExchangeError::MissingToken {
            fields: vec!["foo".to_string()],
        };
        let body = serde_json::to_value(ErrorBody::from(&e)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": "No access token received from provider",
                "received_fields": ["foo"]
            })
        );
    }
}
