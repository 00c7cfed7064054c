use crate::error::AppError;
use crate::models::{FilterCriteria, StockSearchQuery};
use crate::notify::{self, Notification};
use crate::ratios::normalize_code;
use crate::shell::ShellView;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    path: Option<String>,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Which screen a client-side path shows, plus the navigation bar.
pub async fn get_shell(Query(query): Query<PathQuery>) -> (StatusCode, Json<ShellView>) {
    let path = query.path.unwrap_or_else(|| "/".to_string());
    (StatusCode::OK, Json(ShellView::for_path(&path)))
}

/// Look a stock up by symbol, with its ratios unless told otherwise.
pub async fn search_stocks(
    State(state): State<AppState>,
    Json(query): Json<StockSearchQuery>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let symbol = normalize_code(&query.symbol)?;
    if !query.include_ratios {
        return Ok((
            StatusCode::OK,
            Json(json!({ "symbol": symbol, "message": "Search successful" })),
        ));
    }

    let dashboard = state.ratios.fetch_ratios(&symbol).await?;
    Ok((StatusCode::OK, Json(serde_json::to_value(dashboard)?)))
}

/// Ratios for one stock. A failed upstream lookup reads as an unknown stock.
pub async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let symbol = normalize_code(&symbol)?;
    let dashboard = state
        .ratios
        .fetch_ratios(&symbol)
        .await
        .map_err(|e| match e {
            AppError::Upstream(message) => AppError::NotFound(message),
            other => other,
        })?;
    Ok((StatusCode::OK, Json(serde_json::to_value(dashboard)?)))
}

/// Stateless screen: echoes the criteria with the unfiltered stock list.
pub async fn screen_stocks(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let results = state.stocks.fetch_stocks().await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "filters": criteria.normalized(), "results": results })),
    ))
}

/// Snackbar messages queued for this client since the last call.
pub async fn take_notifications(
    session: Session,
) -> Result<(StatusCode, Json<Vec<Notification>>), AppError> {
    let notifications = notify::drain(&session).await?;
    Ok((StatusCode::OK, Json(notifications)))
}
