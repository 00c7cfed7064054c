pub mod prefs;
pub mod ratios;
pub mod reports;
pub mod screener;
pub mod shell;

use crate::notify::{self, Notification};
use crate::share::ShareResponse;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

/// A text payload the browser saves as `file_name`.
pub fn attachment(file_name: &str, content_type: &str, body: String) -> Response {
    let file_name = file_name.replace(&['"', '\\', '\r', '\n'][..], "_");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

/// Queue the message a share produced, if any.
pub async fn notify_share(
    session: &Session,
    response: &ShareResponse,
    auto_hide_ms: u64,
) -> crate::error::AppResult<()> {
    if let Some(message) = &response.message {
        let notification = if response.outcome.is_some() {
            Notification::success(message.clone(), auto_hide_ms)
        } else {
            Notification::error(message.clone(), auto_hide_ms)
        };
        notify::push(session, notification).await?;
    }
    Ok(())
}
