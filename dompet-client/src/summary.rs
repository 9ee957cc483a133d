//! Financial summary aggregator for the insight screen.
//!
//! Two fetches (transaction detail and recommendation detail) run concurrently
//! and are joined; the first failure fails the whole aggregate.

use chrono_tz::Tz;
use dompet_core::{
    parse_backend_date, period_label, truncate_promo_name, CategoryBreakdownEntry, Cif,
    DateRange, FinancialSummary, Locale, ProductRecommendation, PromoRecommendation,
};
use tracing::{debug, warn};

use crate::api::{BankApi, TRANSACTION_ENDPOINT};
use crate::error::FetchError;
use crate::wire::{CategoryRecord, RecommendationDetail, TransactionDetail};

/// How dates in the summary are rendered
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    pub locale: Locale,
    pub timezone: Tz,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            locale: Locale::Indonesian,
            timezone: chrono_tz::Asia::Jakarta,
        }
    }
}

pub async fn aggregate(
    api: &dyn BankApi,
    cif: &Cif,
    range: &DateRange,
    options: SummaryOptions,
) -> Result<FinancialSummary, FetchError> {
    let (detail, recommendations) = tokio::try_join!(
        api.detail_transaction(cif, range),
        api.detail_recommendation(cif, range)
    )?;

    let summary = build_summary(detail, recommendations, options)?;
    if !summary.difference_is_consistent() {
        warn!(
            %cif,
            income = %summary.total_income,
            expense = %summary.total_expense,
            difference = %summary.difference,
            "backend difference does not equal income minus expense"
        );
    }
    debug!(
        %cif,
        income_categories = summary.income_breakdown.len(),
        expense_categories = summary.expense_breakdown.len(),
        promos = summary.promo_merchants.len(),
        "summary aggregated"
    );
    Ok(summary)
}

/// Normalize the two raw payloads into a [`FinancialSummary`]
pub fn build_summary(
    detail: TransactionDetail,
    recommendations: RecommendationDetail,
    options: SummaryOptions,
) -> Result<FinancialSummary, FetchError> {
    let parse = |raw: &str| {
        parse_backend_date(raw, options.timezone).map_err(|e| FetchError::Malformed {
            endpoint: TRANSACTION_ENDPOINT,
            reason: e.to_string(),
        })
    };
    let start = parse(&detail.date_range.start_date)?;
    let end = parse(&detail.date_range.end_date)?;

    let promo_merchants = recommendations
        .promo_recommendations
        .unwrap_or_default()
        .into_iter()
        .map(|p| PromoRecommendation {
            id: p.id.into(),
            display_name: truncate_promo_name(&p.promo_name),
            image_url: p.banner_url,
            target_url: p.promo_url,
            merchant_name: p.merchant_name,
        })
        .collect();

    let product_recommendations = recommendations
        .product_recommendations
        .unwrap_or_default()
        .into_iter()
        .map(|p| ProductRecommendation {
            id: p.id.into(),
            name: p.product_name,
            target_url: p.product_url,
            icon_url: p.icon_url,
        })
        .collect();

    Ok(FinancialSummary {
        period_label: period_label(start, end, options.locale),
        total_income: detail.totals.total_income,
        total_expense: detail.totals.total_expense,
        difference: detail.totals.difference,
        income_breakdown: breakdown(detail.transactions.top_income_categories),
        expense_breakdown: breakdown(detail.transactions.top_expense_categories),
        promo_merchants,
        product_recommendations,
    })
}

// Backend order is kept; lists arrive sorted by amount already.
fn breakdown(records: Vec<CategoryRecord>) -> Vec<CategoryBreakdownEntry> {
    records
        .into_iter()
        .map(|r| CategoryBreakdownEntry {
            name: r.category,
            amount: r.total_amount,
            percentage: r.percentage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn detail(json: serde_json::Value) -> TransactionDetail {
        serde_json::from_value(json).unwrap()
    }

    fn october_detail() -> TransactionDetail {
        detail(serde_json::json!({
            "date_range": { "startDate": "2024-10-01", "endDate": "2024-10-31" },
            "totals": { "totalIncome": 8000000, "totalExpense": 5500000, "difference": 2500000 },
            "transactions": {
                "topIncomeCategories": [
                    { "category": "Gaji", "totalAmount": 7000000, "percentage": 87.5 },
                    { "category": "Bunga", "totalAmount": 1000000, "percentage": 12.5 }
                ],
                "topExpenseCategories": [
                    { "category": "Belanja", "totalAmount": 1500000, "percentage": 27.3 },
                    { "category": "Tagihan", "totalAmount": 3000000, "percentage": 54.5 }
                ]
            }
        }))
    }

    #[test]
    fn test_build_summary_maps_fields() {
        let recs: RecommendationDetail = serde_json::from_value(serde_json::json!({
            "promo_recommendations": [{
                "id": 7,
                "promoName": "Diskon 20% untuk semua menu kopi",
                "bannerUrl": "https://cdn.example/banner.png",
                "promoUrl": "https://promo.example/7",
                "merchantName": "Kopi Kita"
            }],
            "product_recommendations": [{
                "id": "p1",
                "productName": "Tabungan Emas",
                "productUrl": "https://bank.example/emas",
                "iconUrl": "https://cdn.example/emas.png"
            }]
        }))
        .unwrap();

        let s = build_summary(october_detail(), recs, SummaryOptions::default()).unwrap();
        assert_eq!(s.period_label, "1 Okt 2024 - 31 Okt 2024");
        assert_eq!(s.total_income, Decimal::from(8_000_000));
        assert_eq!(s.difference, Decimal::from(2_500_000));
        assert!(s.difference_is_consistent());

        assert_eq!(s.income_breakdown[0].name, "Gaji");
        assert_eq!(s.income_breakdown[0].percentage, 87.5);
        // order is kept even when amounts are not descending
        assert_eq!(s.expense_breakdown[0].name, "Belanja");
        assert_eq!(s.expense_breakdown[1].name, "Tagihan");

        let promo = &s.promo_merchants[0];
        assert_eq!(promo.id, "7");
        assert_eq!(promo.display_name, "Diskon 20% untuk...");
        assert_eq!(promo.target_url, "https://promo.example/7");
        assert_eq!(s.product_recommendations[0].name, "Tabungan Emas");
    }

    #[test]
    fn test_missing_recommendations_are_empty() {
        let s = build_summary(
            october_detail(),
            RecommendationDetail::default(),
            SummaryOptions::default(),
        )
        .unwrap();
        assert!(s.promo_merchants.is_empty());
        assert!(s.product_recommendations.is_empty());
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let mut d = october_detail();
        d.date_range.start_date = "sometime".to_string();
        let err = build_summary(d, RecommendationDetail::default(), SummaryOptions::default())
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { endpoint: TRANSACTION_ENDPOINT, .. }));
    }
}
