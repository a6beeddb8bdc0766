//! Log subscriber setup and per-request tracing.

use tower_http::LatencyUnit;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, HttpMakeClassifier, TraceLayer,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::RuntimeMode;

/// Installs the global subscriber. Production logs JSON lines, anything else logs text.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(mode: RuntimeMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        RuntimeMode::Production => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
        RuntimeMode::Development => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init(),
    }
}

/// Request logging. Production drops request lines to DEBUG so they are hidden by default.
pub fn trace_layer(mode: RuntimeMode) -> TraceLayer<HttpMakeClassifier> {
    let level = match mode {
        RuntimeMode::Production => Level::DEBUG,
        RuntimeMode::Development => Level::INFO,
    };

    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(level))
        .on_request(DefaultOnRequest::new().level(level))
        .on_response(
            DefaultOnResponse::new()
                .level(level)
                .latency_unit(LatencyUnit::Millis),
        )
}
