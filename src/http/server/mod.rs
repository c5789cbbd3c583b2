use std::net::SocketAddr;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::provider::OAuth2Broker;

mod endpoints;

use endpoints::{meta::meta_endpoint, oauth::oauth_endpoint};

use super::encoding::error::handle_reject;

#[derive(Debug)]
pub struct Server {
    broker: Arc<OAuth2Broker>,
}

impl Server {
    pub fn new(broker: Arc<OAuth2Broker>) -> Self {
        Self {
            broker: Arc::clone(&broker),
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let broker = self.broker.clone();

        let api = warp::path("api").and(oauth_endpoint(broker.clone()));
        let meta = meta_endpoint(broker.clone());

        let cors = warp::cors()
            .allow_origins(broker.frontends().origins())
            .allow_credentials(true)
            .allow_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_headers(vec!["content-type", "authorization"]);

        api.or(meta)
            .recover(handle_reject)
            .with(warp::log("http-api"))
            .with(cors)
    }

    pub async fn serve(self, addr: SocketAddr) -> Option<()> {
        let routes = self.routes();

        warp::serve(routes).run(addr).await;

        Some(())
    }
}
