mod account;
mod analysis;
mod event;
mod news;
mod price_point;

pub use account::{Account, AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, UserRecord};
pub use analysis::EventAnalysis;
pub use event::{EconomicIndicators, EventQueryParams, EventRecord, InvestorLessons, MarketAnalysis, RelatedEvent};
pub use news::{NewsArticle, NewsQueryParams, NewsSearchResult};
pub use price_point::{
    Horizon, PerformanceSummary, PricePoint, QuoteSeriesResponse, RawDailyBar, RawDailySeries,
    WindowCounts, WindowPerformance, WindowSet,
};
