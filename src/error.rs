use std::any::Any;

use axum::{
    Json,
    extract::{
        Request, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::FailureResponse;
use crate::config::RuntimeMode;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    NotFound { message: &'static str },
    #[error("{message}")]
    Validation {
        status: StatusCode,
        message: &'static str,
    },
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("no unused bookmark id after {0} attempts")]
    IdExhausted(usize),
    #[error("invalid request body")]
    Body(#[from] JsonRejection),
    #[error("invalid request path")]
    Path(#[from] PathRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message).into_response(),
            AppError::Validation { status, message } => (status, message).into_response(),
            other => Failure::from_error(&other).into_response(),
        }
    }
}

/// An unhandled failure on its way to [`error_responder`].
///
/// Carried as a response extension so the body can be rendered once the runtime mode is
/// known.
#[derive(Debug, Clone)]
pub struct Failure {
    pub message: String,
    pub detail: String,
}

impl Failure {
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Failure {
            message: err.to_string(),
            detail: crate::unpack_error(err),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Turns a handler panic into a [`Failure`] response.
pub fn panic_failure(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_owned()
    };

    Failure {
        detail: format!("panic: {}", message),
        message,
    }
    .into_response()
}

pub fn render_failure(mode: RuntimeMode, failure: &Failure) -> Response {
    let body = match mode {
        RuntimeMode::Production => FailureResponse::generic(),
        RuntimeMode::Development => FailureResponse::detailed(&failure.message, &failure.detail),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Terminal boundary for unhandled failures: any response carrying a [`Failure`] is logged
/// and rewritten into a 500 JSON body. Nothing propagates past this point.
pub async fn error_responder(
    State(mode): State<RuntimeMode>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;

    let Some(failure) = response.extensions().get::<Failure>().cloned() else {
        return response;
    };

    tracing::error!(%method, %uri, error = %failure.detail, "unhandled failure while handling request");
    render_failure(mode, &failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_plain_404() {
        let res = AppError::NotFound {
            message: "Not Found",
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.extensions().get::<Failure>().is_none());
    }

    #[test]
    fn test_validation_uses_given_status() {
        let res = AppError::Validation {
            status: StatusCode::BAD_REQUEST,
            message: "Please provide a Title for this Bookmark",
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_carry_failure() {
        let res = AppError::LockPoisoned("poisoned".to_owned()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failure = res.extensions().get::<Failure>().unwrap();
        assert_eq!(failure.message, "store lock poisoned: poisoned");
    }

    #[test]
    fn test_panic_payloads() {
        let res = panic_failure(Box::new("boom"));
        let failure = res.extensions().get::<Failure>().unwrap();
        assert_eq!(failure.message, "boom");
        assert_eq!(failure.detail, "panic: boom");

        let res = panic_failure(Box::new(String::from("owned boom")));
        assert_eq!(res.extensions().get::<Failure>().unwrap().message, "owned boom");

        let res = panic_failure(Box::new(42));
        assert_eq!(res.extensions().get::<Failure>().unwrap().message, "handler panicked");
    }
}
