use async_trait::async_trait;

use crate::core::types::{AuthCode, ClientCredentials};

pub mod access_token;
pub mod callback;
pub mod error;

pub use access_token::*;
pub use callback::*;
pub use error::{ErrorBody, ExchangeError, ProviderError};

/// One way of presenting an authorization code to the provider's token
/// endpoint. Implementations return the raw JSON payload; shape reconciliation
/// happens in [`normalize`].
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    fn name(&self) -> &'static str;

    async fn request_token(
        &self,
        credentials: &ClientCredentials,
        code: &AuthCode,
    ) -> Result<serde_json::Value, ProviderError>;
}
