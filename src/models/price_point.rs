use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw daily bar as delivered by the quote provider. Only the close is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDailyBar {
    #[serde(rename = "4. close", alias = "close")]
    pub close: String,
}

/// Provider series keyed by `YYYY-MM-DD` date strings.
pub type RawDailySeries = BTreeMap<String, RawDailyBar>;

// A single closing price on a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::OneWeek,
        Horizon::OneMonth,
        Horizon::ThreeMonths,
        Horizon::SixMonths,
    ];

    /// Calendar days covered after the start date.
    pub fn days(self) -> i64 {
        match self {
            Horizon::OneWeek => 7,
            Horizon::OneMonth => 30,
            Horizon::ThreeMonths => 90,
            Horizon::SixMonths => 180,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSet {
    pub one_week: Vec<PricePoint>,
    pub one_month: Vec<PricePoint>,
    pub three_months: Vec<PricePoint>,
    pub six_months: Vec<PricePoint>,
}

impl WindowSet {
    pub fn get(&self, horizon: Horizon) -> &[PricePoint] {
        match horizon {
            Horizon::OneWeek => &self.one_week,
            Horizon::OneMonth => &self.one_month,
            Horizon::ThreeMonths => &self.three_months,
            Horizon::SixMonths => &self.six_months,
        }
    }

    pub(crate) fn slot_mut(&mut self, horizon: Horizon) -> &mut Vec<PricePoint> {
        match horizon {
            Horizon::OneWeek => &mut self.one_week,
            Horizon::OneMonth => &mut self.one_month,
            Horizon::ThreeMonths => &mut self.three_months,
            Horizon::SixMonths => &mut self.six_months,
        }
    }

    pub fn counts(&self) -> WindowCounts {
        WindowCounts {
            one_week_count: self.one_week.len(),
            one_month_count: self.one_month.len(),
            three_months_count: self.three_months.len(),
            six_months_count: self.six_months.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCounts {
    pub one_week_count: usize,
    pub one_month_count: usize,
    pub three_months_count: usize,
    pub six_months_count: usize,
}

/// First/last close of a window and the move between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPerformance {
    pub start_close: f64,
    pub end_close: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub one_week: Option<WindowPerformance>,
    pub one_month: Option<WindowPerformance>,
    pub three_months: Option<WindowPerformance>,
    pub six_months: Option<WindowPerformance>,
}

/// Body of `GET /api/sp500-data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSeriesResponse {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub data: WindowSet,
    pub metadata: WindowCounts,
    pub performance: PerformanceSummary,
}
