use std::sync::Arc;

use warp::Filter;

use crate::auth::CallbackRequest;
use crate::http::encoding::{self, reply};
use crate::provider::OAuth2Broker;

pub fn oauth_endpoint(
    broker: Arc<OAuth2Broker>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_broker = warp::any().map(move || broker.clone());

    // JSON in, JSON out; for frontend API calls
    let token = warp::path("token")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_broker.clone())
        .and(encoding::json_body())
        .and_then(|broker: Arc<OAuth2Broker>, req| async move {
            reply::json_encode(broker.token_request(req).await)
        });

    // Browser redirect from the provider; always answers with a redirect
    let callback = warp::path("callback")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_broker.clone())
        .and(warp::query::<Vec<(String, String)>>())
        .and(encoding::referer())
        .and_then(
            |broker: Arc<OAuth2Broker>, pairs, referer: Option<String>| async move {
                let req = CallbackRequest::from_pairs(pairs);
                let redirect = broker.callback_request(req, referer.as_deref()).await;
                reply::reply(redirect)
            },
        );

    warp::path("oauth").and(token.or(callback))
}
