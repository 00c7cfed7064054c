use crate::error::AppError;
use crate::handlers::{attachment, notify_share};
use crate::models::{RatioDashboard, RatioRow};
use crate::notify::{self, Notification, SCREEN_AUTO_HIDE_MS};
use crate::ratios::{normalize_code, render_report, report_file_name, RatioTab};
use crate::share::{share_link, ShareRequest, ShareResponse};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    tab: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioView {
    pub dashboard: RatioDashboard,
    pub active_tab: RatioTab,
    pub rows: Vec<RatioRow>,
    pub bookmarked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatus {
    pub stock_code: String,
    pub bookmarked: bool,
}

/// Load the ratio dashboard for a stock code, showing the requested tab.
pub async fn get_ratios(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<TabQuery>,
) -> Result<(StatusCode, Json<RatioView>), AppError> {
    let code = normalize_code(&code)?;
    let active_tab = match query.tab.as_deref() {
        Some(tab) => tab.parse::<RatioTab>()?,
        None => RatioTab::default(),
    };

    let dashboard = state.ratios.fetch_ratios(&code).await?;
    let bookmarked = state.prefs.get_bookmarks().await?.contains(&code);
    let rows = dashboard.rows(active_tab).to_vec();

    Ok((
        StatusCode::OK,
        Json(RatioView {
            dashboard,
            active_tab,
            rows,
            bookmarked,
        }),
    ))
}

/// Replay the loading delay. The data itself does not change.
pub async fn refresh_ratios(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let code = normalize_code(&code)?;
    tokio::time::sleep(state.config.delays.refresh).await;
    tracing::debug!("Refreshed ratios for {}", code);

    let notification = Notification::success("Data refreshed successfully", SCREEN_AUTO_HIDE_MS);
    notify::push(&session, notification.clone()).await?;
    Ok((StatusCode::OK, Json(notification)))
}

/// Download the ratio tables as a text report.
pub async fn download_ratios(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let code = normalize_code(&code)?;
    let dashboard = state.ratios.fetch_ratios(&code).await?;

    notify::push(
        &session,
        Notification::success(format!("Download started for {}", code), SCREEN_AUTO_HIDE_MS),
    )
    .await?;

    Ok(attachment(
        &report_file_name(&code),
        "text/plain; charset=utf-8",
        render_report(&dashboard),
    ))
}

/// Share a link to the dashboard of a stock code.
pub async fn share_ratios(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<ShareResponse>), AppError> {
    let code = normalize_code(&code)?;
    let request = ShareRequest {
        title: format!("{} Financial Ratios", code),
        text: format!("Check out the financial ratios for {}", code),
        url: format!("{}/ratios/{}", state.config.frontend_url, code),
    };

    let response = share_link(state.share.as_ref(), request);
    notify_share(&session, &response, SCREEN_AUTO_HIDE_MS).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Add the stock code to the bookmarks, or remove it when already there.
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<BookmarkStatus>), AppError> {
    let code = normalize_code(&code)?;
    let bookmarked = state.prefs.toggle_bookmark(&code).await?;

    let message = if bookmarked {
        "Added to bookmarks"
    } else {
        "Removed from bookmarks"
    };
    notify::push(&session, Notification::success(message, SCREEN_AUTO_HIDE_MS)).await?;

    Ok((
        StatusCode::OK,
        Json(BookmarkStatus {
            stock_code: code,
            bookmarked,
        }),
    ))
}
