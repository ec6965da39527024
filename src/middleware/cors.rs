//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native apps and server-to-server calls are not
//!   restricted by CORS; they usually send no `Origin` at all.
//! - This layer answers every `OPTIONS` request itself (200, empty body), so
//!   pre-flights never reach routing or the admission layer.
//!
//! Policy:
//! - Allow-Origin is echoed only for exact allow-list matches. Anything else
//!   gets no Allow-Origin header, which makes the browser hide the response.
//! - Credentials (cookie `token`) are allowed; never combined with a wildcard.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header, request::Parts};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::services::auth::AllowList;

/// Apply CORS policy to the given Router.
pub fn apply(router: Router, allow_list: Arc<AllowList>) -> Router {
    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req: &Parts| {
        allow_list.contains(origin)
    });

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 10));

    router.layer(cors)
}
