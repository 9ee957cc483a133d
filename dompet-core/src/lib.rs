//! dompet-core: view models, formatting and screen state for the Dompet banking client

pub mod chart;
pub mod format;
pub mod labels;
pub mod model;
pub mod period;
pub mod view_state;

pub use chart::ChartRatios;
pub use format::{format, format_currency, format_grouped, FormatMode};
pub use labels::{short_name, truncate_promo_name};
pub use model::{
    AccountSnapshot, CategoryBreakdownEntry, Cif, DateRange, FinancialSummary,
    ProductRecommendation, PromoRecommendation,
};
pub use period::{format_day, parse_backend_date, parse_timezone, period_label, Locale};
pub use view_state::{
    BreakdownTab, HomeView, InsightView, LoadFailure, LoadStatus, LoginView, RequestId,
    RequestIds,
};
