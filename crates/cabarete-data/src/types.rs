//! Response types for the market-data API.

use serde::Deserialize;

/// One end-of-day price observation.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalPrice {
    /// Trading date (YYYY-MM-DD).
    pub date: String,
    /// Closing price.
    pub close: f64,
}

/// Company profile, used for sector classification.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// GICS-style sector label, when the vendor provides one.
    pub sector: Option<String>,
}

/// One analyst EPS estimate row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystEstimate {
    /// Estimate date (YYYY-MM-DD).
    pub date: String,
    /// Consensus EPS estimate.
    pub estimated_eps_avg: Option<f64>,
}

/// Financial ratios row, used for the fundamentals snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRatios {
    /// Gross profit margin.
    pub gross_profit_margin: Option<f64>,
    /// Debt-to-equity ratio, used as the leverage proxy.
    pub debt_equity_ratio: Option<f64>,
}
