use std::sync::Arc;

use warp::Filter;

use crate::provider::OAuth2Broker;

pub fn meta_endpoint(
    broker: Arc<OAuth2Broker>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_broker = warp::any().map(move || broker.clone());

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_broker.clone())
        .map(|broker: Arc<OAuth2Broker>| warp::reply::json(&broker.health()));

    let root = warp::path::end()
        .and(warp::get())
        .and(with_broker.clone())
        .map(|broker: Arc<OAuth2Broker>| warp::reply::json(&broker.service_info()));

    health.or(root)
}
