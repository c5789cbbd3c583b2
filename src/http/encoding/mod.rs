pub mod error;
pub mod reply;

use crate::auth::TokenRequest;
use warp::{Filter, Rejection};

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn json_body() -> impl Filter<Extract = (TokenRequest,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn referer() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("referer")
}
