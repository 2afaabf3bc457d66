//! HTMX request helpers.
//!
//! Pages are boosted (`hx-boost`), so plain redirects work for them: htmx
//! follows the 303 and swaps the new body. Fragment requests target a
//! single element, where a followed redirect would nest a whole page, so
//! they get an `HX-Redirect` instead.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

const HX_REQUEST: &str = "hx-request";
const HX_BOOSTED: &str = "hx-boosted";
const HX_REDIRECT: &str = "hx-redirect";

/// Whether the request came from an htmx fragment swap (not a boosted
/// page load).
#[must_use]
pub fn is_fragment_request(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST) && !headers.contains_key(HX_BOOSTED)
}

/// Redirect suitable for the kind of request being answered.
#[must_use]
pub fn redirect(headers: &HeaderMap, location: &str) -> Response {
    if is_fragment_request(headers) {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                let mut response = StatusCode::OK.into_response();
                response.headers_mut().insert(HX_REDIRECT, value);
                response
            }
            Err(_) => Redirect::to("/").into_response(),
        }
    } else {
        Redirect::to(location).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    fn htmx_headers(boosted: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        if boosted {
            headers.insert(HX_BOOSTED, HeaderValue::from_static("true"));
        }
        headers
    }

    #[test]
    fn test_plain_and_boosted_requests_get_see_other() {
        for headers in [HeaderMap::new(), htmx_headers(true)] {
            let response = redirect(&headers, "/auth");
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[LOCATION], "/auth");
        }
    }

    #[test]
    fn test_fragment_requests_get_hx_redirect() {
        let response = redirect(&htmx_headers(false), "/auth");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[HX_REDIRECT], "/auth");
    }
}
