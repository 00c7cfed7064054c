use super::{RatioProvider, ReportListProvider, StockListProvider};
use crate::error::AppError;
use crate::models::{
    CompanyInfo, RatioDashboard, RatioRow, ReportFile, ReportStatus, StockRow, Trend,
};
use chrono::{NaiveDate, Utc};
use futures_util::future::BoxFuture;
use std::time::Duration;

/// Sectors offered by the screener's sector picker.
pub const SECTORS: [&str; 6] = [
    "Technology",
    "Healthcare",
    "Financial",
    "Consumer Goods",
    "Energy",
    "Utilities",
];

/// Fixed data returned after a fixed wait. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    pub ratio_delay: Duration,
    pub stock_delay: Duration,
}

impl MockProvider {
    pub fn new(ratio_delay: Duration, stock_delay: Duration) -> Self {
        MockProvider {
            ratio_delay,
            stock_delay,
        }
    }
}

impl RatioProvider for MockProvider {
    fn fetch_ratios<'a>(
        &'a self,
        stock_code: &'a str,
    ) -> BoxFuture<'a, Result<RatioDashboard, AppError>> {
        Box::pin(async move {
            tokio::time::sleep(self.ratio_delay).await;
            tracing::debug!("Serving mock ratios for {}", stock_code);
            Ok(sample_ratios(stock_code))
        })
    }
}

impl StockListProvider for MockProvider {
    fn fetch_stocks(&self) -> BoxFuture<'_, Result<Vec<StockRow>, AppError>> {
        Box::pin(async move {
            tokio::time::sleep(self.stock_delay).await;
            Ok(sample_stocks())
        })
    }
}

impl ReportListProvider for MockProvider {
    fn fetch_reports(&self) -> BoxFuture<'_, Result<Vec<ReportFile>, AppError>> {
        Box::pin(async move { Ok(sample_reports()) })
    }
}

/// The ratio set every stock code gets. Only the labels mention the code.
pub fn sample_ratios(stock_code: &str) -> RatioDashboard {
    RatioDashboard {
        stock_code: stock_code.to_string(),
        balance_sheet: vec![
            RatioRow::new("Current Ratio", "2.5", "1.8", Trend::Up),
            RatioRow::new("Debt-to-Equity", "0.45", "0.60", Trend::Down),
            RatioRow::new("Quick Ratio", "1.8", "1.2", Trend::Up),
        ],
        income_statement: vec![
            RatioRow::new("Gross Margin", "42%", "38%", Trend::Up),
            RatioRow::new("Operating Margin", "28%", "22%", Trend::Up),
            RatioRow::new("Net Profit Margin", "18%", "15%", Trend::Up),
        ],
        cash_flow: vec![
            RatioRow::new("Operating Cash Flow", "1.2B", "900M", Trend::Up),
            RatioRow::new("Free Cash Flow", "850M", "600M", Trend::Up),
            RatioRow::new("Cash Conversion Cycle", "45 days", "60 days", Trend::Down),
        ],
        company_info: CompanyInfo {
            name: format!("{} Company", stock_code),
            sector: "Technology".to_string(),
            last_updated: Utc::now(),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn stock(
    symbol: &str,
    name: &str,
    sector: &str,
    market_cap: &str,
    pe_ratio: &str,
    dividend_yield: &str,
    price: &str,
    change: &str,
) -> StockRow {
    StockRow {
        symbol: symbol.to_string(),
        name: name.to_string(),
        sector: sector.to_string(),
        market_cap: market_cap.to_string(),
        pe_ratio: pe_ratio.to_string(),
        dividend_yield: dividend_yield.to_string(),
        price: price.to_string(),
        change: change.to_string(),
    }
}

pub fn sample_stocks() -> Vec<StockRow> {
    vec![
        stock("AAPL", "Apple Inc.", "Technology", "2.5T", "28.5", "0.6%", "175.20", "+2.3%"),
        stock("MSFT", "Microsoft Corp.", "Technology", "2.1T", "32.1", "0.8%", "310.45", "+1.5%"),
        stock("JNJ", "Johnson & Johnson", "Healthcare", "450B", "16.8", "2.9%", "165.30", "-0.5%"),
        stock("PG", "Procter & Gamble", "Consumer Goods", "380B", "25.3", "2.5%", "145.75", "+0.8%"),
        stock("JPM", "JPMorgan Chase", "Financial", "420B", "11.2", "2.8%", "155.90", "-1.2%"),
    ]
}

fn report(id: i64, name: &str, (y, m, d): (i32, u32, u32), size_label: &str) -> ReportFile {
    ReportFile {
        id,
        name: name.to_string(),
        upload_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
        size_label: size_label.to_string(),
        status: ReportStatus::Completed,
    }
}

pub fn sample_reports() -> Vec<ReportFile> {
    vec![
        report(1, "Q2_2023_AAPL_Analysis.xlsx", (2023, 7, 15), "2.4 MB"),
        report(2, "Competitor_Analysis_Q2.xlsx", (2023, 7, 10), "3.1 MB"),
        report(3, "Market_Trends_2023.pdf", (2023, 6, 28), "5.2 MB"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn code_only_changes_labels() {
        let provider = MockProvider::default();
        let aapl = provider.fetch_ratios("AAPL").await.unwrap();
        let tsla = provider.fetch_ratios("TSLA").await.unwrap();

        assert_eq!(aapl.company_info.name, "AAPL Company");
        assert_eq!(tsla.company_info.name, "TSLA Company");
        assert_eq!(aapl.balance_sheet, tsla.balance_sheet);
        assert_eq!(aapl.income_statement, tsla.income_statement);
        assert_eq!(aapl.cash_flow, tsla.cash_flow);
    }

    #[tokio::test]
    async fn screener_universe_has_unique_symbols() {
        let stocks = MockProvider::default().fetch_stocks().await.unwrap();
        assert_eq!(stocks.len(), 5);
        let mut symbols: Vec<&str> = stocks.iter().map(|s| s.symbol.as_str()).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 5);
        assert!(stocks.iter().all(|s| SECTORS.contains(&s.sector.as_str())));
    }

    #[tokio::test]
    async fn seed_reports_are_completed() {
        let reports = MockProvider::default().fetch_reports().await.unwrap();
        assert_eq!(
            reports.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(reports.iter().all(|r| r.status == ReportStatus::Completed));
        assert_eq!(reports[2].upload_date.to_string(), "2023-06-28");
    }
}
