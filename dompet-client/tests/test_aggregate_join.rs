//! Join and cancellation behaviour against an in-process fake backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use dompet_client::wire::{
    Credentials, LoginResponse, LogoutResponse, RecommendationDetail, TransactionDetail,
    UserEnvelope,
};
use dompet_client::{aggregate, run_worker, BankApi, FetchError, FetchEvent, FetchRequest, SummaryOptions};
use dompet_core::{Cif, DateRange, HomeView, RequestIds};
use tokio::sync::mpsc;

#[derive(Default)]
struct FakeBank {
    fail_recommendations: bool,
    fail_transactions: bool,
    transaction_calls: AtomicUsize,
}

fn network_down(endpoint: &'static str) -> FetchError {
    FetchError::Network {
        endpoint,
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl BankApi for FakeBank {
    async fn user(&self, cif: &Cif) -> Result<UserEnvelope, FetchError> {
        if cif.as_str() == "slow" {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(serde_json::from_value(serde_json::json!({
            "user": {
                "name": format!("Nasabah {}", cif),
                "accountNumber": 1,
                "accountType": "Taplus",
                "totalAmount": 2500000
            }
        }))
        .unwrap())
    }

    async fn detail_transaction(
        &self,
        _cif: &Cif,
        _range: &DateRange,
    ) -> Result<TransactionDetail, FetchError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_transactions {
            return Err(network_down("/detailTransaction"));
        }
        Ok(serde_json::from_value(serde_json::json!({
            "date_range": { "startDate": "2024-10-01", "endDate": "2024-10-31" },
            "totals": { "totalIncome": 0, "totalExpense": 0, "difference": 0 },
            "transactions": { "topIncomeCategories": [], "topExpenseCategories": [] }
        }))
        .unwrap())
    }

    async fn detail_recommendation(
        &self,
        _cif: &Cif,
        _range: &DateRange,
    ) -> Result<RecommendationDetail, FetchError> {
        if self.fail_recommendations {
            return Err(network_down("/detailRecommendation"));
        }
        Ok(RecommendationDetail::default())
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, FetchError> {
        Ok(LoginResponse::default())
    }

    async fn logout(&self) -> Result<LogoutResponse, FetchError> {
        Ok(LogoutResponse::default())
    }
}

fn october() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 10, 31).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_recommendation_failure_fails_aggregate() {
    let bank = FakeBank {
        fail_recommendations: true,
        ..Default::default()
    };
    let cif = Cif::parse("42").unwrap();

    let err = aggregate(&bank, &cif, &october(), SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network { endpoint: "/detailRecommendation", .. }));
    assert_eq!(bank.transaction_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transaction_failure_fails_aggregate() {
    let bank = FakeBank {
        fail_transactions: true,
        ..Default::default()
    };
    let cif = Cif::parse("42").unwrap();

    let err = aggregate(&bank, &cif, &october(), SummaryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network { endpoint: "/detailTransaction", .. }));
}

#[tokio::test]
async fn test_zero_totals_summary() {
    let bank = FakeBank::default();
    let cif = Cif::parse("42").unwrap();

    let summary = aggregate(&bank, &cif, &october(), SummaryOptions::default())
        .await
        .unwrap();
    assert!(summary.income_breakdown.is_empty());
    assert!(summary.difference_is_consistent());
}

#[tokio::test]
async fn test_worker_drops_superseded_account_load() {
    let api: Arc<dyn BankApi> = Arc::new(FakeBank::default());
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut ids = RequestIds::default();
    let mut home = HomeView::new();

    let slow = Cif::parse("slow").unwrap();
    let fast = Cif::parse("fast").unwrap();
    let first = home.begin_load(&slow, &mut ids).unwrap();
    let second = home.begin_load(&fast, &mut ids).unwrap();

    req_tx
        .send(FetchRequest::Account { request_id: first, cif: slow })
        .unwrap();
    req_tx
        .send(FetchRequest::Account { request_id: second, cif: fast })
        .unwrap();
    drop(req_tx);

    run_worker(api, SummaryOptions::default(), req_rx, event_tx).await;

    let mut applied = Vec::new();
    while let Some(event) = event_rx.recv().await {
        if let FetchEvent::Account { request_id, outcome } = event {
            let outcome = outcome.map_err(|e| e.to_load_failure());
            if home.apply(request_id, outcome) {
                applied.push(request_id);
            }
        }
    }

    assert_eq!(applied, vec![second]);
    assert_eq!(home.greeting(), "Hai, Nasabah fast!");
}
