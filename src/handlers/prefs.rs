use crate::error::AppError;
use crate::models::SavedFilter;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// Bookmarked stock codes, oldest first.
pub async fn get_bookmarks(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<String>>), AppError> {
    let bookmarks = state.prefs.get_bookmarks().await?;
    Ok((StatusCode::OK, Json(bookmarks.codes().to_vec())))
}

/// Saved screener filters in the order they were saved.
pub async fn get_saved_filters(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<SavedFilter>>), AppError> {
    let filters = state.prefs.get_saved_filters().await?;
    Ok((StatusCode::OK, Json(filters)))
}
