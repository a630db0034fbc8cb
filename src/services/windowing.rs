//! Slices a daily close series into the four chart windows that follow an
//! event date.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::{
    Horizon, PerformanceSummary, PricePoint, RawDailySeries, WindowPerformance, WindowSet,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid close price '{value}' on {date}")]
    InvalidPrice { date: NaiveDate, value: String },
}

impl From<WindowError> for AppError {
    fn from(value: WindowError) -> Self {
        match value {
            WindowError::InvalidDate(raw) => AppError::InvalidInput(format!(
                "startDate '{}' is not a valid date (YYYY-MM-DD format)",
                raw
            )),
            other => AppError::UpstreamParse(other.to_string()),
        }
    }
}

/// Parses a `YYYY-MM-DD` start date.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, WindowError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| WindowError::InvalidDate(raw.to_string()))
}

/// Turns a free-form event date into a calendar date.
///
/// Only three shapes are accepted: `YYYY` (padded to Jan 1st), `YYYY-MM`
/// (padded to the 1st) and `YYYY-MM-DD`. Anything else has no date.
pub fn normalize_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let padded = match trimmed.len() {
        4 => format!("{}-01-01", trimmed),
        7 => format!("{}-01", trimmed),
        10 => trimmed.to_string(),
        _ => return None,
    };
    NaiveDate::parse_from_str(&padded, DATE_FORMAT).ok()
}

/// Returns the points of `series` dated within `[start, start + horizon]`,
/// ascending by date.
pub fn extract_window(
    series: &RawDailySeries,
    start: NaiveDate,
    horizon: Horizon,
) -> Result<Vec<PricePoint>, WindowError> {
    let end = window_end(start, horizon)?;
    let parsed = parse_series_between(series, start, end)?;
    Ok(slice(&parsed, start, end))
}

/// Builds all four windows from one pass over the raw series.
pub fn build_window_set(
    series: &RawDailySeries,
    start: NaiveDate,
) -> Result<WindowSet, WindowError> {
    // Only prices inside the widest window are validated.
    let widest = window_end(start, Horizon::SixMonths)?;
    let parsed = parse_series_between(series, start, widest)?;

    let mut windows = WindowSet::default();
    for horizon in Horizon::ALL {
        let end = window_end(start, horizon)?;
        *windows.slot_mut(horizon) = slice(&parsed, start, end);
    }
    Ok(windows)
}

/// Last calendar day of the window, or `InvalidDate` past the calendar range.
fn window_end(start: NaiveDate, horizon: Horizon) -> Result<NaiveDate, WindowError> {
    start
        .checked_add_signed(Duration::days(horizon.days()))
        .ok_or_else(|| WindowError::InvalidDate(start.to_string()))
}

/// Start/end closes for each non-empty window.
pub fn summarize(windows: &WindowSet) -> PerformanceSummary {
    let perf = |h| performance(windows.get(h));
    PerformanceSummary {
        one_week: perf(Horizon::OneWeek),
        one_month: perf(Horizon::OneMonth),
        three_months: perf(Horizon::ThreeMonths),
        six_months: perf(Horizon::SixMonths),
    }
}

fn performance(points: &[PricePoint]) -> Option<WindowPerformance> {
    let first = points.first()?;
    let last = points.last()?;
    if first.close == 0.0 {
        return None;
    }
    Some(WindowPerformance {
        start_close: first.close,
        end_close: last.close,
        change_percent: (last.close - first.close) / first.close * 100.0,
    })
}

fn parse_series_between(
    series: &RawDailySeries,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<BTreeMap<NaiveDate, f64>, WindowError> {
    let mut out = BTreeMap::new();
    for (date_str, bar) in series {
        // Keys that are not dates cannot fall inside any window.
        let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT) else {
            continue;
        };
        if date < from || date > to {
            continue;
        }
        let close = bar
            .close
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite() && *c >= 0.0)
            .ok_or_else(|| WindowError::InvalidPrice {
                date,
                value: bar.close.clone(),
            })?;
        out.insert(date, close);
    }
    Ok(out)
}

fn slice(parsed: &BTreeMap<NaiveDate, f64>, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
    parsed
        .range(start..=end)
        .map(|(date, close)| PricePoint {
            date: *date,
            close: *close,
        })
        .collect()
}
