use crate::error::AppError;
use crate::handlers::{attachment, notify_share};
use crate::models::{ReportFile, UploadRequest};
use crate::notify::{self, Notification, REPORTS_AUTO_HIDE_MS};
use crate::reports::{download_content, run_upload, UploadState, EXPORT_FILE_NAME};
use crate::share::{share_link, ShareRequest, ShareResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tower_sessions::Session;

const PENDING_DELETE_KEY: &str = "REPORT_PENDING_DELETE";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsView {
    pub files: Vec<ReportFile>,
    pub count: usize,
    pub export_enabled: bool,
    pub upload: UploadState,
    pub upload_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletePrompt {
    pub id: i64,
    pub name: String,
    pub message: String,
}

fn upload_message(upload: &UploadState) -> Option<String> {
    match upload {
        UploadState::Succeeded { count, .. } => {
            Some(format!("{} file(s) uploaded successfully", count))
        }
        _ => None,
    }
}

/// The report list and the state of the current upload.
pub async fn list_reports(
    State(app): State<AppState>,
) -> Result<(StatusCode, Json<ReportsView>), AppError> {
    let manager = app.reports.lock().await;
    let files = manager.files().to_vec();
    let upload = manager.upload_state().clone();

    Ok((
        StatusCode::OK,
        Json(ReportsView {
            count: files.len(),
            export_enabled: !files.is_empty(),
            upload_message: upload_message(&upload),
            upload,
            files,
        }),
    ))
}

/// Start a simulated upload. Progress advances in the background.
pub async fn upload_reports(
    State(app): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadState>), AppError> {
    let upload = {
        let mut manager = app.reports.lock().await;
        manager.begin_upload(request.files)?;
        manager.upload_state().clone()
    };

    tokio::spawn(run_upload(app.reports.clone(), app.config.delays.upload_tick));

    Ok((StatusCode::ACCEPTED, Json(upload)))
}

pub async fn upload_status(
    State(app): State<AppState>,
) -> Result<(StatusCode, Json<UploadState>), AppError> {
    let manager = app.reports.lock().await;
    Ok((StatusCode::OK, Json(manager.upload_state().clone())))
}

/// Dismiss the "upload complete" banner.
pub async fn dismiss_upload(State(app): State<AppState>) -> StatusCode {
    app.reports.lock().await.dismiss_upload();
    StatusCode::NO_CONTENT
}

/// The list lives in memory, so there is nothing to reload.
pub async fn refresh_reports(session: Session) -> Result<StatusCode, AppError> {
    notify::push(
        &session,
        Notification::success("File list refreshed", REPORTS_AUTO_HIDE_MS),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download a report. The body is placeholder text built from its metadata.
pub async fn download_report(
    State(app): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let file = app.reports.lock().await.get(id)?.clone();
    notify::push(
        &session,
        Notification::success(format!("Downloading {}", file.name), REPORTS_AUTO_HIDE_MS),
    )
    .await?;

    Ok(attachment(
        &file.name,
        "text/plain; charset=utf-8",
        download_content(&file),
    ))
}

pub async fn share_report(
    State(app): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShareResponse>), AppError> {
    let file = app.reports.lock().await.get(id)?.clone();
    let request = ShareRequest {
        title: file.name,
        text: "Check out this financial report".to_string(),
        url: format!("{}/{}", app.config.report_share_base, file.id),
    };

    let response = share_link(app.share.as_ref(), request);
    notify_share(&session, &response, REPORTS_AUTO_HIDE_MS).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// First step of a delete: remember which report the user picked.
pub async fn request_delete(
    State(app): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<DeletePrompt>), AppError> {
    let name = app.reports.lock().await.get(id)?.name.clone();
    session.insert(PENDING_DELETE_KEY, id).await?;

    Ok((
        StatusCode::OK,
        Json(DeletePrompt {
            id,
            message: format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                name
            ),
            name,
        }),
    ))
}

/// Second step of a delete. Only the report picked in the first step
/// can be removed.
pub async fn confirm_delete(
    State(app): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ReportFile>), AppError> {
    let pending: Option<i64> = session.get(PENDING_DELETE_KEY).await?;
    if pending != Some(id) {
        return Err(AppError::Conflict(format!(
            "Delete of report {} was not requested",
            id
        )));
    }
    session.remove::<i64>(PENDING_DELETE_KEY).await?;

    let removed = app.reports.lock().await.delete(id)?;
    tracing::info!("Deleted report {} ({})", removed.id, removed.name);
    notify::push(
        &session,
        Notification::success(format!("{} was deleted", removed.name), REPORTS_AUTO_HIDE_MS),
    )
    .await?;

    Ok((StatusCode::OK, Json(removed)))
}

pub async fn cancel_delete(
    session: Session,
    Path(_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    session.remove::<i64>(PENDING_DELETE_KEY).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every report's metadata as one text file, after the export delay.
/// Labelled a ZIP export, it is plain text.
pub async fn export_reports(
    State(app): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let content = app.reports.lock().await.export_all()?;

    notify::push(
        &session,
        Notification::success("Preparing ZIP archive...", REPORTS_AUTO_HIDE_MS),
    )
    .await?;
    tokio::time::sleep(app.config.delays.export).await;
    notify::push(
        &session,
        Notification::success("ZIP file downloaded", REPORTS_AUTO_HIDE_MS),
    )
    .await?;

    Ok(attachment(EXPORT_FILE_NAME, "text/plain; charset=utf-8", content))
}
