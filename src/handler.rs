use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use crate::api::CreateBookmark;
use crate::config::App;
use crate::error::AppError;
use crate::id_gen::{IdGenerator, UuidGenerator};
use crate::model::Bookmark;
use crate::store::BookmarkStore;

const MAX_ID_ATTEMPTS: usize = 16;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<BookmarkStore>>,
    pub ids: Arc<dyn IdGenerator>,
    pub app: Arc<App>,
}

impl AppState {
    /// State backed by the seeded store and random UUIDs.
    pub fn new(app: App) -> Self {
        AppState::with_parts(app, BookmarkStore::seeded(), Arc::new(UuidGenerator))
    }

    pub fn with_parts(app: App, store: BookmarkStore, ids: Arc<dyn IdGenerator>) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            ids,
            app: Arc::new(app),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, BookmarkStore>, AppError> {
        self.store
            .lock()
            .map_err(|e| AppError::LockPoisoned(e.to_string()))
    }

    fn validation_status(&self) -> StatusCode {
        if self.app.strict_validation {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_FOUND
        }
    }
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Response, AppError> {
    let bookmarks = state.store()?.list();
    Ok((StatusCode::OK, Json(bookmarks)).into_response())
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    let bookmark = state.store()?.find_by_id(&id);

    match bookmark {
        Some(bookmark) => Ok((StatusCode::OK, Json(bookmark)).into_response()),
        None => {
            tracing::error!("Bookmark with id {} not found", id);
            Err(AppError::NotFound {
                message: "Bookmark Not Found",
            })
        }
    }
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookmark>, JsonRejection>,
) -> Result<Response, AppError> {
    // Bodies sent without a JSON content type are read as empty.
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateBookmark::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    let Some(title) = payload.title() else {
        tracing::error!("No Title was provided");
        return Err(AppError::Validation {
            status: state.validation_status(),
            message: "Please provide a Title for this Bookmark",
        });
    };

    let Some(content) = payload.content() else {
        tracing::error!("No Content was provided for the bookmark");
        return Err(AppError::Validation {
            status: state.validation_status(),
            message: "Please provide content for this card",
        });
    };

    let bookmark = {
        let mut store = state.store()?;
        let id = unique_id(state.ids.as_ref(), &store)?;
        let bookmark = Bookmark::new(id, &title, &content);
        store.append(bookmark.clone());
        bookmark
    };

    tracing::info!("Bookmark with id {} created", bookmark.id);

    let location = state.app.location_for(&bookmark.id.to_string());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(bookmark),
    )
        .into_response())
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    let removed = state.store()?.remove_by_id(&id);

    if !removed {
        tracing::error!("Bookmark with id {} not found", id);
        return Err(AppError::NotFound {
            message: "Not Found",
        });
    }

    tracing::info!("Bookmark with id {} deleted", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Answers any request that no route (or no method on a known route) handles.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!("no route for {}", uri);
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn unique_id(ids: &dyn IdGenerator, store: &BookmarkStore) -> Result<String, AppError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = ids.generate_id();
        if !store.contains(&id) {
            return Ok(id);
        }
        tracing::warn!("generated bookmark id {} already in use, drawing another", id);
    }

    Err(AppError::IdExhausted(MAX_ID_ATTEMPTS))
}
