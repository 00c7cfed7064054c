// src/lib.rs
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod prefs;
pub mod providers;
pub mod ratios;
pub mod reports;
pub mod screener;
pub mod share;
pub mod shell;
pub mod state;

// Re-export commonly used items
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::*;
pub use prefs::PreferenceStore;
pub use state::AppState;

use axum::{
    routing::{get, post, put},
    Router,
};

/// All routes, without the session, CORS and tracing layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::shell::health_check))
        .route("/api/shell", get(handlers::shell::get_shell))
        .route("/api/notifications", get(handlers::shell::take_notifications))
        .route("/api/stocks/search", post(handlers::shell::search_stocks))
        .route("/api/stocks/screener", post(handlers::shell::screen_stocks))
        .route("/api/stocks/:symbol", get(handlers::shell::get_stock))
        // Preference routes
        .route("/api/bookmarks", get(handlers::prefs::get_bookmarks))
        .route("/api/filters", get(handlers::prefs::get_saved_filters))
        // Ratio dashboard routes
        .route("/api/ratios/:code", get(handlers::ratios::get_ratios))
        .route("/api/ratios/:code/refresh", post(handlers::ratios::refresh_ratios))
        .route("/api/ratios/:code/download", get(handlers::ratios::download_ratios))
        .route("/api/ratios/:code/share", post(handlers::ratios::share_ratios))
        .route("/api/ratios/:code/bookmark", post(handlers::ratios::toggle_bookmark))
        // Screener routes
        .route("/api/screener", get(handlers::screener::get_screener))
        .route("/api/screener/apply", post(handlers::screener::apply_filters))
        .route("/api/screener/clear", post(handlers::screener::clear_filters))
        .route("/api/screener/refresh", post(handlers::screener::refresh_screener))
        .route("/api/screener/page", put(handlers::screener::change_page))
        .route("/api/screener/export", get(handlers::screener::export_results))
        .route("/api/screener/share", post(handlers::screener::share_screener))
        .route("/api/screener/filters", post(handlers::screener::save_filter))
        // Report routes
        .route("/api/reports", get(handlers::reports::list_reports))
        .route(
            "/api/reports/upload",
            post(handlers::reports::upload_reports)
                .get(handlers::reports::upload_status)
                .delete(handlers::reports::dismiss_upload),
        )
        .route("/api/reports/refresh", post(handlers::reports::refresh_reports))
        .route("/api/reports/export", get(handlers::reports::export_reports))
        .route("/api/reports/:id/download", get(handlers::reports::download_report))
        .route("/api/reports/:id/share", post(handlers::reports::share_report))
        .route("/api/reports/:id/delete", post(handlers::reports::request_delete))
        .route("/api/reports/:id/delete/confirm", post(handlers::reports::confirm_delete))
        .route("/api/reports/:id/delete/cancel", post(handlers::reports::cancel_delete))
        .with_state(state)
}
