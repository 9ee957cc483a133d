//! Drives screen view state through the background fetch worker

use anyhow::{bail, Result};
use dompet_client::{run_worker, BankApi, FetchEvent, FetchRequest, SummaryOptions};
use dompet_core::{Cif, DateRange, HomeView, InsightView, LoadStatus, RequestId, RequestIds};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct Screens {
    ids: RequestIds,
    requests: mpsc::UnboundedSender<FetchRequest>,
    events: mpsc::UnboundedReceiver<FetchEvent>,
    worker: JoinHandle<()>,
}

impl Screens {
    pub fn start(api: Arc<dyn BankApi>, options: SummaryOptions) -> Self {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(api, options, req_rx, event_tx));
        Self {
            ids: RequestIds::default(),
            requests: req_tx,
            events: event_rx,
            worker,
        }
    }

    /// Load the home account card, retrying up to `retries` times on
    /// retryable failures
    pub async fn show_home(&mut self, home: &mut HomeView, cif: &Cif, retries: u32) -> Result<()> {
        if let Some(id) = home.begin_load(cif, &mut self.ids) {
            self.send(FetchRequest::Account {
                request_id: id,
                cif: cif.clone(),
            })?;
        }
        self.settle(Some(&mut *home), None).await?;

        let mut attempts = 0;
        while attempts < retries && is_retryable(home.status()) {
            attempts += 1;
            info!(attempt = attempts, "retrying account load");
            if let Some(id) = home.retry(&mut self.ids) {
                self.send(FetchRequest::Account {
                    request_id: id,
                    cif: cif.clone(),
                })?;
                self.settle(Some(&mut *home), None).await?;
            }
        }
        Ok(())
    }

    pub async fn show_insight(
        &mut self,
        insight: &mut InsightView,
        cif: &Cif,
        range: DateRange,
        retries: u32,
    ) -> Result<()> {
        if let Some(id) = insight.begin_load(cif, range, &mut self.ids) {
            self.send(summary_request(id, cif, range))?;
        }
        self.settle(None, Some(&mut *insight)).await?;

        let mut attempts = 0;
        while attempts < retries && is_retryable(insight.status()) {
            attempts += 1;
            info!(attempt = attempts, "retrying summary load");
            if let Some(id) = insight.retry(&mut self.ids) {
                self.send(summary_request(id, cif, range))?;
                self.settle(None, Some(&mut *insight)).await?;
            }
        }
        Ok(())
    }

    fn send(&self, req: FetchRequest) -> Result<()> {
        debug!(request_id = %req.request_id(), kind = ?req.kind(), "dispatching");
        if self.requests.send(req).is_err() {
            bail!("fetch worker stopped");
        }
        Ok(())
    }

    /// Pump worker events into the views until nothing is pending
    async fn settle(
        &mut self,
        mut home: Option<&mut HomeView>,
        mut insight: Option<&mut InsightView>,
    ) -> Result<()> {
        loop {
            let home_pending = home.as_ref().is_some_and(|h| h.pending().is_some());
            let insight_pending = insight.as_ref().is_some_and(|v| v.pending().is_some());
            if !home_pending && !insight_pending {
                return Ok(());
            }

            let Some(event) = self.events.recv().await else {
                bail!("fetch worker stopped before answering");
            };
            let (request_id, applied) = match event {
                FetchEvent::Account { request_id, outcome } => {
                    if let Err(e) = &outcome {
                        warn!(%request_id, error = %e, "account fetch failed");
                    }
                    let applied = home.as_deref_mut().is_some_and(|h| {
                        h.apply(request_id, outcome.map_err(|e| e.to_load_failure()))
                    });
                    (request_id, applied)
                }
                FetchEvent::Summary { request_id, outcome } => {
                    if let Err(e) = &outcome {
                        warn!(%request_id, error = %e, "summary fetch failed");
                    }
                    let applied = insight.as_deref_mut().is_some_and(|v| {
                        v.apply(request_id, outcome.map_err(|e| e.to_load_failure()))
                    });
                    (request_id, applied)
                }
            };
            if !applied {
                debug!(%request_id, "dropped stale fetch result");
            }
        }
    }

    pub async fn shutdown(self) {
        drop(self.requests);
        let _ = self.worker.await;
    }
}

fn summary_request(request_id: RequestId, cif: &Cif, range: DateRange) -> FetchRequest {
    FetchRequest::Summary {
        request_id,
        cif: cif.clone(),
        range,
    }
}

fn is_retryable(status: &LoadStatus) -> bool {
    matches!(status, LoadStatus::Failed { retryable: true, .. })
}
