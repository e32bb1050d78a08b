//! CSV adapters.
//!
//! Expected schemas (canonical headers, with aliases normalized away):
//!
//! - `prices.csv`: `date,ticker,close`
//! - `eps.csv`: `date,ticker,eps_estimate`
//! - `funda.csv`: `date,ticker,gpm,accruals,leverage`
//! - `sectors.csv`: `ticker,sector`
//!
//! Data is expected to be weekly, or daily that the caller pre-aggregates
//! to weekly. Headers are normalized (BOM stripped, lowercased,
//! whitespace and punctuation collapsed to `_`) and common vendor aliases
//! such as `symbol`, `adj_close`, or `eps_est` map onto the canonical
//! names. Schema violations are input-validation errors naming the file
//! and column.

use crate::error::{DataError, Result};
use cabarete_traits::{Date, Fundamentals, Panel, SectorMap, Ticker};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Normalize a raw header: strip BOM, lowercase, collapse whitespace and
/// `-`/`/` runs into single underscores.
fn normalize_header(raw: &str) -> String {
    let cleaned = raw.replace('\u{feff}', "");
    let mut out = String::with_capacity(cleaned.len());
    let mut pending_sep = false;
    for c in cleaned.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '/' || c == '_' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// Map a normalized header onto its canonical column name.
fn canonical_header(raw: &str) -> String {
    let normalized = normalize_header(raw);
    match normalized.as_str() {
        "as_of" | "timestamp" | "datetime" => "date".to_string(),
        "symbol" | "ticker_symbol" => "ticker".to_string(),
        "closing_price" | "close_price" | "price" | "adj_close" | "adjusted_close"
        | "adjclose" => "close".to_string(),
        "eps" | "estimate" | "eps_est" => "eps_estimate".to_string(),
        "gross_profit_margin" => "gpm".to_string(),
        "accrual" => "accruals".to_string(),
        "debt_to_assets" | "debt_to_equity" => "leverage".to_string(),
        "industry" => "sector".to_string(),
        _ => normalized,
    }
}

/// Read a CSV with every column as strings and headers canonicalized.
fn read_csv(path: &Path) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in names {
        let canonical = canonical_header(&name);
        if canonical != name && df.column(&canonical).is_err() {
            df.rename(&name, canonical.into())?;
        }
    }
    Ok(df)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("csv")
        .to_string()
}

fn string_values(df: &DataFrame, path: &Path, column: &str) -> Result<Vec<Option<String>>> {
    let col = df.column(column).map_err(|_| DataError::Schema {
        file: file_name(path),
        message: format!(
            "missing column '{column}' (available: {})",
            df.get_column_names()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })?;
    Ok(col
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

fn parse_date(path: &Path, row: usize, raw: &str) -> Result<Date> {
    let head = raw.get(..10).unwrap_or(raw);
    Date::parse_from_str(head, "%Y-%m-%d").map_err(|_| DataError::Schema {
        file: file_name(path),
        message: format!("row {row}: invalid date '{raw}'"),
    })
}

fn parse_float(path: &Path, row: usize, column: &str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| DataError::Schema {
        file: file_name(path),
        message: format!("row {row}: invalid {column} value '{raw}'"),
    })
}

/// Load a wide-by-date panel from a `date,ticker,<value>` CSV.
fn load_panel_csv(path: &Path, value_column: &str) -> Result<Panel> {
    let df = read_csv(path)?;
    let dates = string_values(&df, path, "date")?;
    let tickers = string_values(&df, path, "ticker")?;
    let values = string_values(&df, path, value_column)?;

    let mut out = Panel::new();
    for (row, ((date, ticker), value)) in
        dates.iter().zip(&tickers).zip(&values).enumerate()
    {
        let (Some(date), Some(ticker), Some(value)) = (date, ticker, value) else {
            continue;
        };
        let date = parse_date(path, row + 2, date)?;
        let value = parse_float(path, row + 2, value_column, value)?;
        out.entry(date)
            .or_default()
            .insert(ticker.trim().to_string(), value);
    }
    Ok(out)
}

/// Load `{date -> {ticker -> close}}` from a prices CSV.
///
/// # Errors
///
/// Returns a schema error for missing columns or unparseable rows.
pub fn load_prices_csv(path: &Path) -> Result<Panel> {
    load_panel_csv(path, "close")
}

/// Load `{date -> {ticker -> eps_estimate}}` from an EPS CSV.
///
/// # Errors
///
/// Returns a schema error for missing columns or unparseable rows.
pub fn load_eps_csv(path: &Path) -> Result<Panel> {
    load_panel_csv(path, "eps_estimate")
}

/// Load the latest fundamentals snapshot per ticker from a
/// `date,ticker,gpm,accruals,leverage` CSV.
///
/// When a ticker appears on several dates, the newest row wins.
///
/// # Errors
///
/// Returns a schema error for missing columns or unparseable rows.
pub fn load_fundamentals_csv(path: &Path) -> Result<BTreeMap<Ticker, Fundamentals>> {
    let df = read_csv(path)?;
    let dates = string_values(&df, path, "date")?;
    let tickers = string_values(&df, path, "ticker")?;
    let gpm = string_values(&df, path, "gpm")?;
    let accruals = string_values(&df, path, "accruals")?;
    let leverage = string_values(&df, path, "leverage")?;

    let mut latest: BTreeMap<Ticker, (Date, Fundamentals)> = BTreeMap::new();
    for row in 0..df.height() {
        let (Some(date), Some(ticker)) = (&dates[row], &tickers[row]) else {
            continue;
        };
        let date = parse_date(path, row + 2, date)?;
        let parse = |column: &str, value: &Option<String>| -> Result<f64> {
            value
                .as_ref()
                .map_or(Ok(0.0), |v| parse_float(path, row + 2, column, v))
        };
        let funda = Fundamentals {
            gpm: parse("gpm", &gpm[row])?,
            accruals: parse("accruals", &accruals[row])?,
            leverage: parse("leverage", &leverage[row])?,
        };
        let ticker = ticker.trim().to_string();
        match latest.get(&ticker) {
            Some((existing, _)) if *existing > date => {}
            _ => {
                latest.insert(ticker, (date, funda));
            }
        }
    }
    Ok(latest
        .into_iter()
        .map(|(ticker, (_, funda))| (ticker, funda))
        .collect())
}

/// Load a `{ticker -> sector}` map from a `ticker,sector` CSV.
///
/// # Errors
///
/// Returns a schema error for missing columns.
pub fn load_sectors_csv(path: &Path) -> Result<SectorMap> {
    let df = read_csv(path)?;
    let tickers = string_values(&df, path, "ticker")?;
    let sectors = string_values(&df, path, "sector")?;

    Ok(tickers
        .into_iter()
        .zip(sectors)
        .filter_map(|(ticker, sector)| {
            Some((ticker?.trim().to_string(), sector?.trim().to_string()))
        })
        .collect())
}
