//! Background fetch worker.
//!
//! Screens send [`FetchRequest`]s tagged with a request id and receive
//! [`FetchEvent`]s back. A newer request of the same kind aborts the one still
//! in flight, so at most one account load and one summary load run at a time.

use dompet_core::{AccountSnapshot, Cif, DateRange, FinancialSummary, RequestId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::account::load_account;
use crate::api::BankApi;
use crate::error::FetchError;
use crate::summary::{aggregate, SummaryOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Account,
    Summary,
}

#[derive(Debug, Clone)]
pub enum FetchRequest {
    Account {
        request_id: RequestId,
        cif: Cif,
    },
    Summary {
        request_id: RequestId,
        cif: Cif,
        range: DateRange,
    },
}

impl FetchRequest {
    pub fn kind(&self) -> FetchKind {
        match self {
            FetchRequest::Account { .. } => FetchKind::Account,
            FetchRequest::Summary { .. } => FetchKind::Summary,
        }
    }

    pub fn request_id(&self) -> RequestId {
        match self {
            FetchRequest::Account { request_id, .. } | FetchRequest::Summary { request_id, .. } => {
                *request_id
            }
        }
    }
}

#[derive(Debug)]
pub enum FetchEvent {
    Account {
        request_id: RequestId,
        outcome: Result<AccountSnapshot, FetchError>,
    },
    Summary {
        request_id: RequestId,
        outcome: Result<FinancialSummary, FetchError>,
    },
}

pub async fn run_worker(
    api: Arc<dyn BankApi>,
    options: SummaryOptions,
    mut rx: mpsc::UnboundedReceiver<FetchRequest>,
    tx: mpsc::UnboundedSender<FetchEvent>,
) {
    let mut in_flight: HashMap<FetchKind, JoinHandle<()>> = HashMap::new();

    while let Some(req) = rx.recv().await {
        // cancel superseded
        if let Some(handle) = in_flight.remove(&req.kind()) {
            if !handle.is_finished() {
                debug!(kind = ?req.kind(), superseded_by = %req.request_id(), "aborting in-flight fetch");
            }
            handle.abort();
        }

        let kind = req.kind();
        let api = Arc::clone(&api);
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            let event = match req {
                FetchRequest::Account { request_id, cif } => FetchEvent::Account {
                    request_id,
                    outcome: load_account(api.as_ref(), &cif).await,
                },
                FetchRequest::Summary {
                    request_id,
                    cif,
                    range,
                } => FetchEvent::Summary {
                    request_id,
                    outcome: aggregate(api.as_ref(), &cif, &range, options).await,
                },
            };
            let _ = tx.send(event);
        });
        in_flight.insert(kind, handle);
    }

    // requests closed: let the remaining fetches report
    for (_, handle) in in_flight {
        let _ = handle.await;
    }
}
