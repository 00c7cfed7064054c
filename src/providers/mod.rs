//! Data sources behind the three screens.
//!
//! Each provider hands back a boxed future so a handler can hold it as a
//! trait object and a real network source can replace the mock without any
//! handler changes.

pub mod alpha_vantage;
pub mod mock;

use crate::error::AppError;
use crate::models::{RatioDashboard, ReportFile, StockRow};
use futures_util::future::BoxFuture;

pub use alpha_vantage::AlphaVantageProvider;
pub use mock::MockProvider;

/// Financial ratios for a single stock code.
pub trait RatioProvider: Send + Sync {
    fn fetch_ratios<'a>(&'a self, stock_code: &'a str)
        -> BoxFuture<'a, Result<RatioDashboard, AppError>>;
}

/// The universe of stocks the screener shows.
pub trait StockListProvider: Send + Sync {
    fn fetch_stocks(&self) -> BoxFuture<'_, Result<Vec<StockRow>, AppError>>;
}

/// Reports already on file when the report manager starts.
pub trait ReportListProvider: Send + Sync {
    fn fetch_reports(&self) -> BoxFuture<'_, Result<Vec<ReportFile>, AppError>>;
}
