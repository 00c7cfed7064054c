use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a ratio relative to its previous reading.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
        }
    }
}

/// One line of a ratio table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatioRow {
    pub metric: String,
    pub value: String,
    pub industry_average: String,
    pub trend: Trend,
}

impl RatioRow {
    pub fn new(metric: &str, value: &str, industry_average: &str, trend: Trend) -> Self {
        RatioRow {
            metric: metric.to_string(),
            value: value.to_string(),
            industry_average: industry_average.to_string(),
            trend,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub sector: String,
    pub last_updated: DateTime<Utc>,
}

/// Everything the ratio screen shows for one stock code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatioDashboard {
    pub stock_code: String,
    pub balance_sheet: Vec<RatioRow>,
    pub income_statement: Vec<RatioRow>,
    pub cash_flow: Vec<RatioRow>,
    pub company_info: CompanyInfo,
}

/// A row of the screener table. Values are display strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub dividend_yield: String,
    pub price: String,
    pub change: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Completed,
}

/// Metadata of an uploaded report. No file bytes are kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportFile {
    pub id: i64,
    pub name: String,
    pub upload_date: NaiveDate,
    pub size_label: String,
    pub status: ReportStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketCapBucket {
    Large,
    Mid,
    Small,
}

impl MarketCapBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            MarketCapBucket::Large => "large",
            MarketCapBucket::Mid => "mid",
            MarketCapBucket::Small => "small",
        }
    }
}

/// Screener criteria as entered by the user. `None` means "any".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub market_cap: Option<MarketCapBucket>,
    #[serde(default, rename = "peRatio")]
    pub max_pe: Option<f64>,
    #[serde(default, rename = "dividendYield")]
    pub min_dividend_yield: Option<f64>,
}

impl FilterCriteria {
    /// The same criteria with blank sectors and zero or non-finite numbers
    /// dropped. Those values mean "unset".
    pub fn normalized(self) -> Self {
        FilterCriteria {
            sector: self
                .sector
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            market_cap: self.market_cap,
            max_pe: self.max_pe.filter(|v| is_set_number(*v)),
            min_dividend_yield: self.min_dividend_yield.filter(|v| is_set_number(*v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clone().normalized() == FilterCriteria::default()
    }
}

fn is_set_number(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SavedFilter {
    pub name: String,
    #[serde(rename = "filters")]
    pub criteria: FilterCriteria,
    #[serde(rename = "date")]
    pub saved_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StockSearchQuery {
    pub symbol: String,
    #[serde(default = "default_include_ratios")]
    pub include_ratios: bool,
}

fn default_include_ratios() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SaveFilterRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub rows_per_page: Option<usize>,
}

/// A file selected for upload. Only the name and size travel.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_use_screen_field_names() {
        let criteria = FilterCriteria {
            sector: Some("Energy".into()),
            market_cap: Some(MarketCapBucket::Mid),
            max_pe: Some(20.0),
            min_dividend_yield: None,
        };
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["marketCap"], "mid");
        assert_eq!(json["peRatio"], 20.0);
        assert!(json["dividendYield"].is_null());
    }

    #[test]
    fn blank_and_zero_criteria_are_unset() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"sector":"  ","peRatio":0,"dividendYield":1.5}"#).unwrap();
        assert!(!criteria.is_empty());

        let criteria = criteria.normalized();
        assert!(criteria.sector.is_none());
        assert!(criteria.max_pe.is_none());
        assert_eq!(criteria.min_dividend_yield, Some(1.5));

        let blank: FilterCriteria = serde_json::from_str(r#"{"sector":"","peRatio":0}"#).unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn partial_criteria_deserialize() {
        let criteria: FilterCriteria = serde_json::from_str(r#"{"sector":"Healthcare"}"#).unwrap();
        assert_eq!(criteria.sector.as_deref(), Some("Healthcare"));
        assert!(criteria.market_cap.is_none());
        assert!(!criteria.is_empty());
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn trend_arrows() {
        assert_eq!(Trend::Up.arrow(), "↑");
        assert_eq!(Trend::Down.arrow(), "↓");
        assert_eq!(Trend::Flat.arrow(), "→");
    }
}
