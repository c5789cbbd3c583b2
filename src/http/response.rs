use crate::auth::{ExchangeError, Redirect};
use tracing::{event, Level};
use warp::http::header::{HeaderValue, LOCATION};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

fn location_header(redirect: &Redirect) -> Result<HeaderValue, ExchangeError> {
    HeaderValue::from_str(&redirect.location()).map_err(|e| {
        ExchangeError::Internal(format!(
            "redirect target {:?} is not a valid Location header: {}",
            redirect.target.0, e
        ))
    })
}

impl Reply for Redirect {
    fn into_response(self) -> Response {
        match location_header(&self) {
            Ok(location) => {
                let mut response = Response::new(warp::hyper::Body::empty());
                *response.status_mut() = StatusCode::FOUND;
                response.headers_mut().insert(LOCATION, location);
                response
            }
            Err(e) => {
                event!(Level::ERROR, error = ?e, "Failed to build callback redirect; check FRONTEND_ORIGIN");
                e.status().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RedirectTarget;

    #[test]
    fn redirect_becomes_found_with_location() {
        let redirect = Redirect::error(
            RedirectTarget::new("http://localhost:5173"),
            "missing_code",
            "none",
        );
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "http://localhost:5173/dashboard?error=missing_code&error_description=none"
        );
    }

    #[test]
    fn unusable_target_is_an_internal_error() {
        let redirect = Redirect::error(RedirectTarget::new("http://bad\nhost"), "x", "y");

        match location_header(&redirect) {
            Err(ExchangeError::Internal(detail)) => assert!(detail.contains("Location")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            redirect.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
