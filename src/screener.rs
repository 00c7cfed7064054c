//! Stock screener state: criteria, pagination and the export/share helpers.
//!
//! Criteria are recorded but never narrow the result set. Applying or clearing
//! them only changes what is stored; the rows on screen stay the same.

use crate::error::{AppError, AppResult};
use crate::models::{FilterCriteria, SavedFilter, StockRow};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const EXPORT_FILE_NAME: &str = "stock_screener_results.csv";

/// Per-client screener state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerState {
    pub criteria: FilterCriteria,
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for ScreenerState {
    fn default() -> Self {
        ScreenerState {
            criteria: FilterCriteria::default(),
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl ScreenerState {
    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria.normalized();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change the page size. Goes back to the first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> AppResult<()> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            return Err(AppError::BadRequest(format!(
                "Rows per page must be one of {:?}",
                ROWS_PER_PAGE_OPTIONS
            )));
        }
        self.rows_per_page = rows_per_page;
        self.page = 0;
        Ok(())
    }

    pub fn visible<'a>(&self, rows: &'a [StockRow]) -> &'a [StockRow] {
        page_slice(rows, self.page, self.rows_per_page)
    }
}

/// `rows[page * per_page .. page * per_page + per_page]`, clipped to the
/// rows available. A page past the end is empty.
pub fn page_slice<T>(rows: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_mul(per_page);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(rows.len());
    &rows[start..end]
}

/// One `symbol,name,sector,price` line per row.
pub fn export_csv(rows: &[StockRow]) -> AppResult<String> {
    if rows.is_empty() {
        return Err(AppError::Conflict("Nothing to export".to_string()));
    }
    Ok(rows
        .iter()
        .map(|s| format!("{},{},{},{}", s.symbol, s.name, s.sector, s.price))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Link to the screener carrying only the criteria that are set.
pub fn share_url(frontend_url: &str, criteria: &FilterCriteria) -> AppResult<String> {
    let mut url = Url::parse(&format!("{}/screener", frontend_url))
        .map_err(|e| AppError::BadRequest(format!("Invalid frontend url: {}", e)))?;

    let criteria = criteria.clone().normalized();
    if !criteria.is_empty() {
        let mut query = url.query_pairs_mut();
        if let Some(bucket) = criteria.market_cap {
            query.append_pair("marketCap", bucket.as_str());
        }
        if let Some(max_pe) = criteria.max_pe {
            query.append_pair("peRatio", &max_pe.to_string());
        }
        if let Some(sector) = criteria.sector.as_deref() {
            query.append_pair("sector", sector);
        }
        if let Some(min_yield) = criteria.min_dividend_yield {
            query.append_pair("dividendYield", &min_yield.to_string());
        }
    }

    Ok(url.to_string())
}

/// Snapshot `criteria` under `name`. Blank names are rejected.
pub fn snapshot_filter(name: &str, criteria: &FilterCriteria) -> AppResult<SavedFilter> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Filter name is required".to_string()));
    }
    Ok(SavedFilter {
        name: name.to_string(),
        criteria: criteria.clone(),
        saved_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarketCapBucket;
    use crate::providers::mock::sample_stocks;

    #[test]
    fn slices_follow_page_arithmetic() {
        let rows: Vec<u32> = (0..12).collect();
        for per_page in ROWS_PER_PAGE_OPTIONS {
            for page in 0..4 {
                let start = (page * per_page).min(rows.len());
                let end = (page * per_page + per_page).min(rows.len());
                assert_eq!(page_slice(&rows, page, per_page), &rows[start..end]);
            }
        }
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let rows = sample_stocks();
        assert!(page_slice(&rows, 1, 10).is_empty());
        assert!(page_slice(&rows, usize::MAX, 25).is_empty());
        assert_eq!(page_slice(&rows, 0, 25).len(), 5);
    }

    #[test]
    fn last_page_is_clipped() {
        let rows = sample_stocks();
        let page = page_slice(&rows, 1, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].symbol, "PG");
    }

    #[test]
    fn rows_per_page_change_resets_page() {
        let mut state = ScreenerState::default();
        state.set_page(3);
        state.set_rows_per_page(5).unwrap();
        assert_eq!(state.page, 0);
        assert_eq!(state.rows_per_page, 5);
    }

    #[test]
    fn unlisted_rows_per_page_is_rejected() {
        let mut state = ScreenerState::default();
        state.set_page(2);
        assert!(state.set_rows_per_page(7).is_err());
        assert_eq!(state.rows_per_page, DEFAULT_ROWS_PER_PAGE);
        assert_eq!(state.page, 2);
    }

    #[test]
    fn applying_filters_leaves_rows_alone() {
        let rows = sample_stocks();
        let mut state = ScreenerState::default();
        let before = state.visible(&rows).to_vec();

        state.apply_filters(FilterCriteria {
            sector: Some("Energy".into()),
            max_pe: Some(10.0),
            ..Default::default()
        });
        assert_eq!(state.visible(&rows), before.as_slice());

        state.clear_filters();
        assert!(state.criteria.is_empty());
        assert_eq!(state.visible(&rows), before.as_slice());
    }

    #[test]
    fn csv_has_one_line_per_row() {
        let csv = export_csv(&sample_stocks()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "AAPL,Apple Inc.,Technology,175.20");
        assert_eq!(lines[2], "JNJ,Johnson & Johnson,Healthcare,165.30");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn csv_of_nothing_is_refused() {
        assert!(export_csv(&[]).is_err());
    }

    #[test]
    fn share_url_carries_only_set_criteria() {
        let criteria = FilterCriteria {
            sector: Some("Consumer Goods".into()),
            market_cap: Some(MarketCapBucket::Large),
            max_pe: Some(25.0),
            min_dividend_yield: None,
        };
        let url = share_url("http://localhost:5173", &criteria).unwrap();
        assert_eq!(
            url,
            "http://localhost:5173/screener?marketCap=large&peRatio=25&sector=Consumer+Goods"
        );
    }

    #[test]
    fn share_url_skips_blank_and_zero_criteria() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"sector":"","peRatio":0}"#).unwrap();
        let url = share_url("http://localhost:5173", &criteria).unwrap();
        assert_eq!(url, "http://localhost:5173/screener");

        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"sector":" ","marketCap":"mid","dividendYield":0}"#).unwrap();
        let url = share_url("http://localhost:5173", &criteria).unwrap();
        assert_eq!(url, "http://localhost:5173/screener?marketCap=mid");
    }

    #[test]
    fn applied_criteria_drop_blank_values() {
        let mut state = ScreenerState::default();
        state.apply_filters(serde_json::from_str(r#"{"sector":"","peRatio":15}"#).unwrap());
        assert!(state.criteria.sector.is_none());
        assert_eq!(state.criteria.max_pe, Some(15.0));
    }

    #[test]
    fn share_url_without_criteria_has_no_query() {
        let url = share_url("http://localhost:5173", &FilterCriteria::default()).unwrap();
        assert_eq!(url, "http://localhost:5173/screener");
    }

    #[test]
    fn blank_filter_name_is_rejected() {
        assert!(snapshot_filter("   ", &FilterCriteria::default()).is_err());
        let saved = snapshot_filter("Value picks", &FilterCriteria::default()).unwrap();
        assert_eq!(saved.name, "Value picks");
    }
}
