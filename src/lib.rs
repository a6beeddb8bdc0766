use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
};
use std::error::Error;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handler::AppState;

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod id_gen;
pub mod logging;
pub mod model;
pub mod routes;
pub mod store;

/// The complete service: bookmark routes plus fallback, failure handling, security headers,
/// CORS and request logging.
pub fn app(state: AppState) -> Router {
    with_service_layers(routes::routes(), state)
}

/// Wraps `router` in the layers every route of the service runs behind.
pub fn with_service_layers(router: Router<AppState>, state: AppState) -> Router {
    let mode = state.app.mode();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-download-options"),
            HeaderValue::from_static("noopen"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    router
        .fallback(handler::not_found)
        .layer(CatchPanicLayer::custom(error::panic_failure))
        .layer(middleware::from_fn_with_state(mode, error::error_responder))
        .layer(security_headers)
        .layer(cors)
        .layer(logging::trace_layer(mode))
        .with_state(state)
}

/// Joins an error and its sources with `": "`. A source whose text already appears in the
/// previous part is skipped, since wrappers often embed their cause in their own message.
pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(source) = current {
        let text = source.to_string();
        if !parts.last().is_some_and(|last| last.contains(&text)) {
            parts.push(text);
        }
        current = source.source();
    }
    parts.join(": ")
}
