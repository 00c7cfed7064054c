use crate::error::AppError;
use crate::handlers::{attachment, notify_share};
use crate::models::{FilterCriteria, PageRequest, SaveFilterRequest, SavedFilter, StockRow};
use crate::notify::{self, Notification, SCREEN_AUTO_HIDE_MS};
use crate::providers::mock::SECTORS;
use crate::screener::{
    export_csv, share_url, snapshot_filter, ScreenerState, EXPORT_FILE_NAME, ROWS_PER_PAGE_OPTIONS,
};
use crate::share::{share_link, ShareRequest, ShareResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tower_sessions::Session;

const SCREENER_KEY: &str = "SCREENER";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerView {
    #[serde(flatten)]
    pub state: ScreenerState,
    pub rows_per_page_options: [usize; 3],
    pub sectors: [&'static str; 6],
    pub total_count: usize,
    pub rows: Vec<StockRow>,
}

async fn load_state(session: &Session) -> Result<ScreenerState, AppError> {
    Ok(session.get(SCREENER_KEY).await?.unwrap_or_default())
}

async fn store_state(session: &Session, state: &ScreenerState) -> Result<(), AppError> {
    session.insert(SCREENER_KEY, state).await?;
    Ok(())
}

async fn build_view(
    app: &AppState,
    screener: ScreenerState,
) -> Result<(StatusCode, Json<ScreenerView>), AppError> {
    let stocks = app.stocks.fetch_stocks().await?;
    let rows = screener.visible(&stocks).to_vec();
    Ok((
        StatusCode::OK,
        Json(ScreenerView {
            state: screener,
            rows_per_page_options: ROWS_PER_PAGE_OPTIONS,
            sectors: SECTORS,
            total_count: stocks.len(),
            rows,
        }),
    ))
}

/// The current page of screener results along with the criteria in effect.
pub async fn get_screener(
    State(app): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<ScreenerView>), AppError> {
    let screener = load_state(&session).await?;
    build_view(&app, screener).await
}

/// Record new criteria. The result set is left as it was.
pub async fn apply_filters(
    State(app): State<AppState>,
    session: Session,
    Json(criteria): Json<FilterCriteria>,
) -> Result<(StatusCode, Json<ScreenerView>), AppError> {
    let mut screener = load_state(&session).await?;
    tokio::time::sleep(app.config.delays.apply_filters).await;

    tracing::debug!("Applying screener criteria {:?}", criteria);
    screener.apply_filters(criteria);
    store_state(&session, &screener).await?;
    notify::push(
        &session,
        Notification::success("Filters applied successfully", SCREEN_AUTO_HIDE_MS),
    )
    .await?;

    build_view(&app, screener).await
}

pub async fn clear_filters(
    State(app): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<ScreenerView>), AppError> {
    let mut screener = load_state(&session).await?;
    screener.clear_filters();
    store_state(&session, &screener).await?;
    notify::push(&session, Notification::success("Filters cleared", SCREEN_AUTO_HIDE_MS)).await?;

    build_view(&app, screener).await
}

pub async fn refresh_screener(
    State(app): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<ScreenerView>), AppError> {
    let screener = load_state(&session).await?;
    tokio::time::sleep(app.config.delays.refresh).await;
    notify::push(&session, Notification::success("Data refreshed", SCREEN_AUTO_HIDE_MS)).await?;

    build_view(&app, screener).await
}

/// Move to another page or change the page size. A new page size
/// starts over at the first page.
pub async fn change_page(
    State(app): State<AppState>,
    session: Session,
    Json(request): Json<PageRequest>,
) -> Result<(StatusCode, Json<ScreenerView>), AppError> {
    let mut screener = load_state(&session).await?;
    match (request.rows_per_page, request.page) {
        (Some(rows_per_page), _) => screener.set_rows_per_page(rows_per_page)?,
        (None, Some(page)) => screener.set_page(page),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either page or rowsPerPage is required".to_string(),
            ))
        }
    }
    store_state(&session, &screener).await?;

    build_view(&app, screener).await
}

/// Every result row as CSV.
pub async fn export_results(
    State(app): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let stocks = app.stocks.fetch_stocks().await?;
    let csv = export_csv(&stocks)?;
    notify::push(&session, Notification::success("Export started", SCREEN_AUTO_HIDE_MS)).await?;

    Ok(attachment(EXPORT_FILE_NAME, "text/csv; charset=utf-8", csv))
}

/// Share a screener link carrying the current criteria.
pub async fn share_screener(
    State(app): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<ShareResponse>), AppError> {
    let screener = load_state(&session).await?;
    let request = ShareRequest {
        title: "My Stock Screener".to_string(),
        text: "Check out this stock screener configuration".to_string(),
        url: share_url(&app.config.frontend_url, &screener.criteria)?,
    };

    let response = share_link(app.share.as_ref(), request);
    notify_share(&session, &response, SCREEN_AUTO_HIDE_MS).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Save the current criteria under a name.
pub async fn save_filter(
    State(app): State<AppState>,
    session: Session,
    Json(request): Json<SaveFilterRequest>,
) -> Result<(StatusCode, Json<SavedFilter>), AppError> {
    let screener = load_state(&session).await?;
    let saved = snapshot_filter(&request.name, &screener.criteria)?;
    app.prefs.append_saved_filter(saved.clone()).await?;

    tracing::info!("Saved screener filter {:?}", saved.name);
    notify::push(
        &session,
        Notification::success(format!("Filter \"{}\" saved", saved.name), SCREEN_AUTO_HIDE_MS),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}
