//! Market-data API client.
//!
//! A thin fetch boundary over a Financial Modeling Prep-style REST API:
//! daily closes resampled to a weekly grid, analyst EPS estimates, a
//! ratios-based fundamentals snapshot, and sector profiles. The core
//! never calls this; the CLI uses it to build snapshots.

use crate::error::{DataError, Result};
use crate::types::{AnalystEstimate, CompanyProfile, FinancialRatios, HistoricalPrice};
use cabarete_traits::{Date, Fundamentals, Panel, SectorMap, Ticker};
use chrono::{Datelike, Weekday};
use reqwest::Client;
use std::collections::BTreeMap;
use std::env;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Market-data API client.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MarketDataClient {
    /// Create a client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
        }
    }

    /// Create a client from the `FMP_API_KEY` environment variable,
    /// loading a `.env` file first when present.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingApiKey`] when the variable is unset.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let api_key = env::var("FMP_API_KEY").map_err(|_| DataError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Override the base URL (mirrors, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{}/{endpoint}&apikey={}", self.base_url, self.api_key)
        } else {
            format!("{}/{endpoint}?apikey={}", self.base_url, self.api_key)
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimitExceeded);
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;
        if text.contains("\"Error Message\"") {
            return Err(DataError::Api(text));
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Weekly close panel for the given symbols over `[from, to]`
    /// (YYYY-MM-DD). Daily closes are resampled to the last trading day
    /// of each ISO week and keyed by that week's Friday.
    ///
    /// # Errors
    ///
    /// Returns an error when a request fails; symbols with no data are
    /// skipped.
    pub async fn weekly_closes(&self, symbols: &[&str], from: &str, to: &str) -> Result<Panel> {
        let mut panel = Panel::new();
        for symbol in symbols {
            let endpoint = format!(
                "historical-price-eod/full?symbol={}&from={from}&to={to}",
                symbol.to_uppercase()
            );
            let prices: Vec<HistoricalPrice> = self.get(&endpoint).await?;
            for (week, close) in weekly_resample(&prices) {
                panel
                    .entry(week)
                    .or_default()
                    .insert(symbol.to_uppercase(), close);
            }
        }
        Ok(panel)
    }

    /// Analyst EPS estimate panel, keyed by each estimate date's ISO-week
    /// Friday (best effort; vendors publish on irregular dates).
    ///
    /// # Errors
    ///
    /// Returns an error when a request fails.
    pub async fn weekly_eps_estimates(&self, symbols: &[&str], limit: u32) -> Result<Panel> {
        let mut panel = Panel::new();
        for symbol in symbols {
            let endpoint = format!(
                "analyst-estimates?symbol={}&period=quarter&limit={limit}",
                symbol.to_uppercase()
            );
            let estimates: Vec<AnalystEstimate> = self.get(&endpoint).await?;
            for estimate in estimates {
                let (Ok(date), Some(eps)) = (
                    Date::parse_from_str(&estimate.date, "%Y-%m-%d"),
                    estimate.estimated_eps_avg,
                ) else {
                    continue;
                };
                panel
                    .entry(week_anchor(date))
                    .or_default()
                    .insert(symbol.to_uppercase(), eps);
            }
        }
        Ok(panel)
    }

    /// Latest fundamentals snapshot from the ratios endpoint.
    ///
    /// Gross margin and leverage map directly; the vendor publishes no
    /// accruals figure, so it stays at 0 and the quality composite leans
    /// on the other two components.
    ///
    /// # Errors
    ///
    /// Returns an error when a request fails.
    pub async fn fundamentals_latest(
        &self,
        symbols: &[&str],
    ) -> Result<BTreeMap<Ticker, Fundamentals>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            let endpoint = format!("ratios?symbol={}&limit=1", symbol.to_uppercase());
            let ratios: Vec<FinancialRatios> = self.get(&endpoint).await?;
            let Some(latest) = ratios.first() else {
                continue;
            };
            out.insert(
                symbol.to_uppercase(),
                Fundamentals {
                    gpm: latest.gross_profit_margin.unwrap_or(0.0),
                    accruals: 0.0,
                    leverage: latest.debt_equity_ratio.unwrap_or(0.0),
                },
            );
        }
        Ok(out)
    }

    /// Fetch all four snapshot inputs in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error among the four requests.
    pub async fn snapshot_inputs(
        &self,
        symbols: &[&str],
        from: &str,
        to: &str,
        estimate_limit: u32,
    ) -> Result<(Panel, Panel, BTreeMap<Ticker, Fundamentals>, SectorMap)> {
        let (prices, eps, fundamentals, sectors) = tokio::join!(
            self.weekly_closes(symbols, from, to),
            self.weekly_eps_estimates(symbols, estimate_limit),
            self.fundamentals_latest(symbols),
            self.sector_map(symbols),
        );
        Ok((prices?, eps?, fundamentals?, sectors?))
    }

    /// Sector map from company profiles; symbols without a published
    /// sector are omitted and fall back to `"UNK"` downstream.
    ///
    /// # Errors
    ///
    /// Returns an error when a request fails.
    pub async fn sector_map(&self, symbols: &[&str]) -> Result<SectorMap> {
        let mut map = BTreeMap::new();
        for symbol in symbols {
            let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
            let profiles: Vec<CompanyProfile> = self.get(&endpoint).await?;
            if let Some(profile) = profiles.first() {
                if let Some(sector) = &profile.sector {
                    map.insert(profile.symbol.clone(), sector.clone());
                }
            }
        }
        Ok(SectorMap::new(map))
    }
}

/// Friday of the ISO week containing `date`, used as the weekly grid key.
fn week_anchor(date: Date) -> Date {
    let iso = date.iso_week();
    Date::from_isoywd_opt(iso.year(), iso.week(), Weekday::Fri).unwrap_or(date)
}

/// Collapse daily closes to one observation per ISO week: the last
/// trading day's close, keyed by the week's Friday.
fn weekly_resample(prices: &[HistoricalPrice]) -> BTreeMap<Date, f64> {
    let mut last_per_week: BTreeMap<Date, (Date, f64)> = BTreeMap::new();
    for price in prices {
        let Ok(date) = Date::parse_from_str(&price.date, "%Y-%m-%d") else {
            continue;
        };
        let anchor = week_anchor(date);
        match last_per_week.get(&anchor) {
            Some((existing, _)) if *existing > date => {}
            _ => {
                last_per_week.insert(anchor, (date, price.close));
            }
        }
    }
    last_per_week
        .into_iter()
        .map(|(week, (_, close))| (week, close))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = MarketDataClient::new("test_key");
        assert_eq!(
            client.url("profile?symbol=AAPL"),
            "https://financialmodelingprep.com/stable/profile?symbol=AAPL&apikey=test_key"
        );
        assert_eq!(
            client.url("ratios"),
            "https://financialmodelingprep.com/stable/ratios?apikey=test_key"
        );
    }

    #[test]
    fn test_with_base_url() {
        let client = MarketDataClient::new("k").with_base_url("http://localhost:9999");
        assert!(client.url("profile").starts_with("http://localhost:9999/"));
    }

    #[test]
    fn test_week_anchor_is_friday() {
        // 2024-01-03 is a Wednesday; its ISO week's Friday is 2024-01-05.
        let wed = Date::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(week_anchor(wed), Date::from_ymd_opt(2024, 1, 5).unwrap());
        let fri = Date::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(week_anchor(fri), fri);
    }

    #[test]
    fn test_weekly_resample_keeps_last_trading_day() {
        let prices = vec![
            HistoricalPrice {
                date: "2024-01-03".to_string(),
                close: 10.0,
            },
            HistoricalPrice {
                date: "2024-01-04".to_string(),
                close: 11.0,
            },
            // Holiday-shortened week: Thursday is the last session.
            HistoricalPrice {
                date: "2024-01-11".to_string(),
                close: 12.0,
            },
        ];
        let weekly = weekly_resample(&prices);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[&Date::from_ymd_opt(2024, 1, 5).unwrap()], 11.0);
        assert_eq!(weekly[&Date::from_ymd_opt(2024, 1, 12).unwrap()], 12.0);
    }

    #[test]
    fn test_weekly_resample_skips_bad_dates() {
        let prices = vec![HistoricalPrice {
            date: "not-a-date".to_string(),
            close: 10.0,
        }];
        assert!(weekly_resample(&prices).is_empty());
    }
}
