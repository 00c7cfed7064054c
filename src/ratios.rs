use crate::error::AppError;
use crate::models::{RatioDashboard, RatioRow};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RatioTab {
    #[default]
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl RatioTab {
    pub const ALL: [RatioTab; 3] = [
        RatioTab::BalanceSheet,
        RatioTab::IncomeStatement,
        RatioTab::CashFlow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatioTab::BalanceSheet => "Balance Sheet",
            RatioTab::IncomeStatement => "Income Statement",
            RatioTab::CashFlow => "Cash Flow",
        }
    }
}

impl FromStr for RatioTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance-sheet" => Ok(RatioTab::BalanceSheet),
            "income-statement" => Ok(RatioTab::IncomeStatement),
            "cash-flow" => Ok(RatioTab::CashFlow),
            other => Err(AppError::BadRequest(format!("Unknown tab: {}", other))),
        }
    }
}

impl RatioDashboard {
    pub fn rows(&self, tab: RatioTab) -> &[RatioRow] {
        match tab {
            RatioTab::BalanceSheet => &self.balance_sheet,
            RatioTab::IncomeStatement => &self.income_statement,
            RatioTab::CashFlow => &self.cash_flow,
        }
    }
}

/// Stock codes arrive in whatever case the user typed.
pub fn normalize_code(code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
        return Err(AppError::BadRequest(format!("Invalid stock code: {:?}", code)));
    }
    Ok(code.to_ascii_uppercase())
}

pub fn report_file_name(stock_code: &str) -> String {
    format!("{}_ratios.txt", stock_code)
}

/// Plain-text rendition of every tab.
pub fn render_report(dashboard: &RatioDashboard) -> String {
    let info = &dashboard.company_info;
    let mut out = format!(
        "{} Financial Ratios\n{} | {}\nLast updated: {}\n",
        dashboard.stock_code,
        info.name,
        info.sector,
        info.last_updated.to_rfc3339()
    );
    for tab in RatioTab::ALL {
        out.push_str(&format!("\n[{}]\n", tab.label()));
        for row in dashboard.rows(tab) {
            out.push_str(&format!(
                "{}: {} (industry {}) {}\n",
                row.metric,
                row.value,
                row.industry_average,
                row.trend.arrow()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::sample_ratios;

    #[test]
    fn tabs_parse_from_kebab_case() {
        assert_eq!("cash-flow".parse::<RatioTab>().unwrap(), RatioTab::CashFlow);
        assert!("cashflow".parse::<RatioTab>().is_err());
    }

    #[test]
    fn rows_follow_the_tab() {
        let dashboard = sample_ratios("AAPL");
        assert_eq!(dashboard.rows(RatioTab::BalanceSheet)[0].metric, "Current Ratio");
        assert_eq!(dashboard.rows(RatioTab::IncomeStatement)[2].metric, "Net Profit Margin");
        assert_eq!(dashboard.rows(RatioTab::CashFlow)[2].value, "45 days");
    }

    #[test]
    fn codes_are_uppercased() {
        assert_eq!(normalize_code(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_code("brk.b").unwrap(), "BRK.B");
        assert!(normalize_code("").is_err());
        assert!(normalize_code("../etc").is_err());
    }

    #[test]
    fn report_lists_each_tab() {
        let text = render_report(&sample_ratios("MSFT"));
        assert!(text.starts_with("MSFT Financial Ratios\nMSFT Company | Technology\n"));
        assert!(text.contains("[Income Statement]\nGross Margin: 42% (industry 38%) ↑\n"));
        assert!(text.contains("Debt-to-Equity: 0.45 (industry 0.60) ↓"));
        assert_eq!(report_file_name("MSFT"), "MSFT_ratios.txt");
    }
}
