use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::auth::Frontends;
use crate::core::types::RedirectTarget;
use crate::provider::ProviderConfig;

#[derive(Debug, Parser)]
#[clap(
    name = "autocart-oauthd",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    #[clap(long, env = "PAYMAN_CLIENT_ID")]
    pub client_id: Option<String>,
    #[clap(long, env = "PAYMAN_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
    #[clap(long, env = "PORT", default_value = "5000")]
    pub port: u16,
    #[clap(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,
    /// Only used to announce where the service is reachable.
    #[clap(long, env = "RENDER_EXTERNAL_URL")]
    pub external_url: Option<String>,
    #[clap(long, env = "PAYMAN_API_URL", default_value = "https://agent.payman.ai/api")]
    pub provider_url: Url,
    #[clap(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "10")]
    pub provider_timeout_secs: u64,
    #[clap(long, env = "FRONTEND_ORIGIN", default_value = "https://auto-cart.vercel.app")]
    pub frontend_origin: Url,
    #[clap(
        long,
        env = "DEV_FRONTEND_ORIGINS",
        use_value_delimiter = true,
        default_value = "http://localhost:8080,http://localhost:5173,http://localhost:3000"
    )]
    pub dev_origins: Vec<Url>,
}

fn origin_of(url: &Url) -> RedirectTarget {
    RedirectTarget::new(url.origin().ascii_serialization())
}

impl Options {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn provider(&self) -> ProviderConfig {
        ProviderConfig {
            api_url: self.provider_url.clone(),
            timeout: Duration::from_secs(self.provider_timeout_secs.max(1)),
        }
    }

    pub fn frontends(&self) -> Frontends {
        Frontends {
            production: origin_of(&self.frontend_origin),
            local: self.dev_origins.iter().map(origin_of).collect(),
        }
    }
}
