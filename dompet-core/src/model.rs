//! View-model types produced by the aggregation layer

use anyhow::{bail, Result};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer identifier used as the key for every account/transaction query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cif(String);

impl Cif {
    /// Parse a CIF, rejecting blank identifiers
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            bail!("customer identifier is empty");
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive reporting period sent to the backend as `YYYY-MM-DD` bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            bail!("period start {start} is after period end {end}");
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Query-string form of the start bound
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// Query-string form of the end bound
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Account card shown on the home screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account_type: String,
    pub account_number: String,
    /// Balance already formatted with grouped digits (no currency prefix)
    pub balance: String,
    /// First two words of the account holder's name
    pub holder_name: String,
}

/// One category's share of a period's income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownEntry {
    pub name: String,
    pub amount: Decimal,
    /// Backend-computed share (0-100); never normalized client-side
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoRecommendation {
    pub id: String,
    pub display_name: String,
    pub image_url: String,
    pub target_url: String,
    pub merchant_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    pub id: String,
    pub name: String,
    pub target_url: String,
    pub icon_url: String,
}

/// Normalized insight-screen data for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub period_label: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Taken from the backend as-is
    pub difference: Decimal,
    pub income_breakdown: Vec<CategoryBreakdownEntry>,
    pub expense_breakdown: Vec<CategoryBreakdownEntry>,
    pub promo_merchants: Vec<PromoRecommendation>,
    pub product_recommendations: Vec<ProductRecommendation>,
}

impl FinancialSummary {
    /// True when the backend `difference` equals income minus expense
    pub fn difference_is_consistent(&self) -> bool {
        self.total_income
            .checked_sub(self.total_expense)
            .is_some_and(|expected| expected == self.difference)
    }
}
