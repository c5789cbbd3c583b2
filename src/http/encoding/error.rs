use crate::auth::{ErrorBody, ExchangeError};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

#[derive(Debug)]
pub enum AuthRejection {
    Exchange(ExchangeError),
}

impl warp::reject::Reject for AuthRejection {}

impl From<ExchangeError> for AuthRejection {
    fn from(error: ExchangeError) -> Self {
        Self::Exchange(error)
    }
}

fn json_error(body: &ErrorBody, status: StatusCode) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

pub async fn handle_reject(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(AuthRejection::Exchange(e)) = err.find::<AuthRejection>() {
        return Ok(json_error(&ErrorBody::from(e), e.status()));
    }

    if err.find::<warp::body::BodyDeserializeError>().is_some() {
        let body = ErrorBody {
            error: "Invalid request body".to_string(),
            received_fields: None,
        };
        return Ok(json_error(&body, StatusCode::BAD_REQUEST));
    }

    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        let body = ErrorBody {
            error: "Request body too large".to_string(),
            received_fields: None,
        };
        return Ok(json_error(&body, StatusCode::PAYLOAD_TOO_LARGE));
    }

    Err(err)
}
