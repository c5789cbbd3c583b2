use url::Url;

use crate::core::types::{AuthCode, RedirectTarget};

use super::access_token::AccessTokenResponse;

pub const MISSING_CODE_DESCRIPTION: &str = "No authorization code received";

/// Query parameters of the provider's browser redirect.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CallbackOutcome {
    Denied { error: String, description: String },
    MissingCode,
    Exchange(AuthCode),
}

impl CallbackRequest {
    /// Builds the request from raw query pairs. A repeated key keeps its
    /// first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut req = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "code" => &mut req.code,
                "error" => &mut req.error,
                "error_description" => &mut req.error_description,
                "state" => &mut req.state,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        req
    }

    /// The provider's own error takes precedence over any code that may also
    /// be present.
    pub fn outcome(&self) -> CallbackOutcome {
        let error = self.error.as_deref().filter(|e| !e.is_empty());

        if let Some(error) = error {
            return CallbackOutcome::Denied {
                error: error.to_string(),
                description: self.error_description.clone().unwrap_or_default(),
            };
        }

        match AuthCode::from_input(self.code.as_deref()) {
            Some(code) => CallbackOutcome::Exchange(code),
            None => CallbackOutcome::MissingCode,
        }
    }
}

/// The frontend deployments this backend may send a browser back to.
#[derive(Debug, Clone)]
pub struct Frontends {
    pub production: RedirectTarget,
    pub local: Vec<RedirectTarget>,
}

impl Default for Frontends {
    fn default() -> Self {
        Self {
            production: RedirectTarget::new("https://auto-cart.vercel.app"),
            local: vec![
                RedirectTarget::new("http://localhost:8080"),
                RedirectTarget::new("http://localhost:5173"),
                RedirectTarget::new("http://localhost:3000"),
            ],
        }
    }
}

impl Frontends {
    /// Only local development origins are honoured from the Referer; anything
    /// else lands on production.
    pub fn select(&self, referer: Option<&str>) -> RedirectTarget {
        referer
            .and_then(|r| Url::parse(r).ok())
            .map(|url| url.origin().ascii_serialization())
            .and_then(|origin| self.local.iter().find(|t| t.0 == origin).cloned())
            .unwrap_or_else(|| self.production.clone())
    }

    pub fn origins(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.production.as_ref()).chain(self.local.iter().map(AsRef::as_ref))
    }
}

/// A browser redirect to the frontend dashboard carrying its result in the
/// query string.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub target: RedirectTarget,
    pub params: Vec<(&'static str, String)>,
}

impl Redirect {
    pub fn error(target: RedirectTarget, error: &str, description: &str) -> Self {
        Self {
            target,
            params: vec![
                ("error", error.to_string()),
                ("error_description", description.to_string()),
            ],
        }
    }

    pub fn token(target: RedirectTarget, token: &AccessTokenResponse) -> Self {
        Self {
            target,
            params: vec![
                ("access_token", token.access_token.clone()),
                ("expires_in", token.expires_in.to_string()),
            ],
        }
    }

    pub fn location(&self) -> String {
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/dashboard?{}", self.target.as_ref(), query)
    }
}
