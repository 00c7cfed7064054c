use super::RatioProvider;
use crate::error::AppError;
use crate::models::{CompanyInfo, RatioDashboard, RatioRow, Trend};
use chrono::Utc;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const CACHE_TTL: Duration = Duration::from_secs(300);

/// The subset of the OVERVIEW payload the ratio screen uses.
/// Alpha Vantage sends every number as a string, "None" when missing.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct CompanyOverview {
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "CurrentRatio")]
    pub current_ratio: Option<String>,
    #[serde(rename = "DebtToEquity")]
    pub debt_to_equity: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<String>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
}

impl CompanyOverview {
    /// Error, rate limit and unknown-symbol payloads carry no company data.
    pub fn into_company(self) -> Result<CompanyOverview, AppError> {
        if let Some(message) = self
            .error_message
            .as_ref()
            .or(self.information.as_ref())
            .or(self.note.as_ref())
        {
            return Err(AppError::Upstream(message.clone()));
        }
        if self.symbol.is_none() && self.name.is_none() {
            return Err(AppError::Upstream("No company overview returned".to_string()));
        }
        Ok(self)
    }
}

// Make the client and cache static and reusable
lazy_static::lazy_static! {
    static ref CLIENT: reqwest::Client = reqwest::Client::new();
    static ref CACHE: Mutex<HashMap<String, (CompanyOverview, Instant)>> = Mutex::new(HashMap::new());
}

/// Ratio provider backed by the Alpha Vantage company overview.
#[derive(Clone)]
pub struct AlphaVantageProvider {
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        AlphaVantageProvider {
            api_key: api_key.into(),
        }
    }

    pub async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview, AppError> {
        // Check if the symbol is in the cache and still valid
        if let Some((overview, timestamp)) = CACHE.lock().await.get(symbol) {
            if timestamp.elapsed() < CACHE_TTL {
                return Ok(overview.clone());
            }
        }

        let mut url = Url::parse(BASE_URL).map_err(|e| AppError::Upstream(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("function", "OVERVIEW")
            .append_pair("symbol", symbol)
            .append_pair("apikey", &self.api_key);

        let response = CLIENT
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Failed to fetch company overview: HTTP {}",
                response.status()
            )));
        }

        let overview = response
            .json::<CompanyOverview>()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?
            .into_company()?;

        CACHE
            .lock()
            .await
            .insert(symbol.to_string(), (overview.clone(), Instant::now()));

        Ok(overview)
    }
}

impl RatioProvider for AlphaVantageProvider {
    fn fetch_ratios<'a>(
        &'a self,
        stock_code: &'a str,
    ) -> BoxFuture<'a, Result<RatioDashboard, AppError>> {
        Box::pin(async move {
            let overview = self.fetch_overview(stock_code).await?;
            tracing::info!("Fetched overview for {}", stock_code);
            Ok(overview_to_dashboard(stock_code, &overview))
        })
    }
}

/// Missing or unparseable numbers count as zero.
fn ratio_value(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn overview_row(metric: &str, value: String) -> RatioRow {
    RatioRow {
        metric: metric.to_string(),
        value,
        industry_average: "N/A".to_string(),
        trend: Trend::Flat,
    }
}

pub fn overview_to_dashboard(stock_code: &str, overview: &CompanyOverview) -> RatioDashboard {
    let current_ratio = ratio_value(overview.current_ratio.as_deref());
    let debt_to_equity = ratio_value(overview.debt_to_equity.as_deref());
    let pe_ratio = ratio_value(overview.pe_ratio.as_deref());
    let dividend_yield = ratio_value(overview.dividend_yield.as_deref());

    RatioDashboard {
        stock_code: stock_code.to_string(),
        balance_sheet: vec![
            overview_row("Current Ratio", format!("{:.2}", current_ratio)),
            overview_row("Debt-to-Equity", format!("{:.2}", debt_to_equity)),
        ],
        income_statement: vec![
            overview_row("P/E Ratio", format!("{:.2}", pe_ratio)),
            overview_row("Dividend Yield", format!("{:.2}%", dividend_yield * 100.0)),
        ],
        cash_flow: Vec::new(),
        company_info: CompanyInfo {
            name: overview.name.clone().unwrap_or_default(),
            sector: overview.sector.clone().unwrap_or_default(),
            last_updated: Utc::now(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_maps_into_ratio_rows() {
        let overview: CompanyOverview = serde_json::from_str(
            r#"{"Name":"Apple Inc","Sector":"TECHNOLOGY","CurrentRatio":"0.867",
                "PERatio":"29.1","DividendYield":"0.0052","DebtToEquity":"None"}"#,
        )
        .unwrap();
        let dashboard = overview_to_dashboard("AAPL", &overview);

        assert_eq!(dashboard.company_info.name, "Apple Inc");
        assert_eq!(dashboard.balance_sheet[0].value, "0.87");
        assert_eq!(dashboard.balance_sheet[1].value, "0.00");
        assert_eq!(dashboard.income_statement[0].value, "29.10");
        assert_eq!(dashboard.income_statement[1].value, "0.52%");
        assert!(dashboard.cash_flow.is_empty());
        assert!(dashboard
            .balance_sheet
            .iter()
            .all(|r| r.trend == Trend::Flat && r.industry_average == "N/A"));
    }

    fn parse(payload: &str) -> Result<CompanyOverview, AppError> {
        serde_json::from_str::<CompanyOverview>(payload)
            .unwrap()
            .into_company()
    }

    #[test]
    fn error_payload_is_upstream_error() {
        let err = parse(r#"{"Error Message":"Invalid API call."}"#).unwrap_err();
        assert_eq!(err.to_string(), "Upstream error: Invalid API call.");
    }

    #[test]
    fn rate_limit_payloads_are_upstream_errors() {
        let err = parse(r#"{"Information":"rate limit"}"#).unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m == "rate limit"));

        let err = parse(r#"{"Note":"Thank you for using Alpha Vantage!"}"#).unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn empty_payload_for_unknown_symbol_is_rejected() {
        assert!(matches!(parse("{}"), Err(AppError::Upstream(_))));
    }

    #[test]
    fn company_payload_passes_through() {
        let overview = parse(r#"{"Symbol":"IBM","Name":"IBM","PERatio":"22.4"}"#).unwrap();
        assert_eq!(overview.symbol.as_deref(), Some("IBM"));
        assert_eq!(overview.pe_ratio.as_deref(), Some("22.4"));
    }
}
