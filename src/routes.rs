use axum::{
    Router,
    routing::{get, post},
};

use crate::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookmark",
            get(handler::list_bookmarks).fallback(handler::not_found),
        )
        .route(
            "/bookmarks",
            post(handler::create_bookmark).fallback(handler::not_found),
        )
        .route(
            "/bookmarks/:id",
            get(handler::get_bookmark)
                .delete(handler::delete_bookmark)
                .fallback(handler::not_found),
        )
}
