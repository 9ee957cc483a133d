//! Screen view state: explicit structs owned by a screen and handed by
//! reference to its render function.
//!
//! Every load is tagged with a [`RequestId`]. A result is applied only when its
//! id matches the view's pending request, so a slow response for an old
//! customer or period can never overwrite a newer one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chart::ChartRatios;
use crate::format::CURRENCY_PREFIX;
use crate::model::{AccountSnapshot, CategoryBreakdownEntry, Cif, DateRange, FinancialSummary};

/// Placeholder shown instead of the balance while hidden or unavailable
pub const MASKED_BALANCE: &str = "********";
pub const LOADING_TEXT: &str = "Loading...";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic request id source; one per running app
#[derive(Debug, Default)]
pub struct RequestIds {
    last: u64,
}

impl RequestIds {
    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// Why a load failed, as the view needs to know it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed { message: String, retryable: bool },
}

impl LoadStatus {
    fn failed(failure: LoadFailure) -> Self {
        LoadStatus::Failed {
            message: failure.message,
            retryable: failure.retryable,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HomeView {
    cif: Option<Cif>,
    /// Last good snapshot and the customer it belongs to
    snapshot: Option<(Cif, AccountSnapshot)>,
    balance_visible: bool,
    status: LoadStatus,
    pending: Option<RequestId>,
}

impl HomeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading the account for `cif`.
    ///
    /// Returns `None` when that customer is already loaded or in flight, so
    /// the account is fetched exactly once per customer change.
    pub fn begin_load(&mut self, cif: &Cif, ids: &mut RequestIds) -> Option<RequestId> {
        let same_customer = self.cif.as_ref() == Some(cif);
        if same_customer && matches!(self.status, LoadStatus::Loading | LoadStatus::Ready) {
            return None;
        }
        self.cif = Some(cif.clone());
        let id = ids.next_id();
        self.pending = Some(id);
        self.status = LoadStatus::Loading;
        Some(id)
    }

    /// Re-issue the load after a failure
    pub fn retry(&mut self, ids: &mut RequestIds) -> Option<RequestId> {
        if !matches!(self.status, LoadStatus::Failed { .. }) {
            return None;
        }
        let cif = self.cif.clone()?;
        self.status = LoadStatus::Idle;
        self.begin_load(&cif, ids)
    }

    /// Apply a finished load. Returns false when `id` is stale.
    ///
    /// A failure keeps the previous snapshot untouched.
    pub fn apply(&mut self, id: RequestId, outcome: Result<AccountSnapshot, LoadFailure>) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        match (outcome, self.cif.clone()) {
            (Ok(snapshot), Some(cif)) => {
                self.snapshot = Some((cif, snapshot));
                self.status = LoadStatus::Ready;
            }
            (Ok(_), None) => return false,
            (Err(failure), _) => self.status = LoadStatus::failed(failure),
        }
        true
    }

    pub fn toggle_balance(&mut self) {
        self.balance_visible = !self.balance_visible;
    }

    pub fn balance_visible(&self) -> bool {
        self.balance_visible
    }

    /// `Rp1.234.567` when visible and loaded, `Rp********` otherwise
    pub fn balance_text(&self) -> String {
        match (self.snapshot(), self.balance_visible) {
            (Some(snapshot), true) => format!("{}{}", CURRENCY_PREFIX, snapshot.balance),
            _ => format!("{}{}", CURRENCY_PREFIX, MASKED_BALANCE),
        }
    }

    pub fn greeting(&self) -> String {
        match self.snapshot() {
            Some(snapshot) => format!("Hai, {}!", snapshot.holder_name),
            None => LOADING_TEXT.to_string(),
        }
    }

    /// The snapshot to display: only for the current customer, and never
    /// after a failed load (the screen falls back to its placeholder state)
    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        if matches!(self.status, LoadStatus::Failed { .. }) {
            return None;
        }
        match (&self.snapshot, &self.cif) {
            (Some((owner, snapshot)), Some(cif)) if owner == cif => Some(snapshot),
            _ => None,
        }
    }

    /// Last good snapshot, kept across failures, whichever customer it was for
    pub fn retained_snapshot(&self) -> Option<&AccountSnapshot> {
        self.snapshot.as_ref().map(|(_, snapshot)| snapshot)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }
}

// ---------------------------------------------------------------------------
// Insight
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakdownTab {
    #[default]
    Income,
    Expense,
}

impl BreakdownTab {
    pub fn title(&self) -> &'static str {
        match self {
            BreakdownTab::Income => "Pemasukan",
            BreakdownTab::Expense => "Pengeluaran",
        }
    }
}

#[derive(Debug, Default)]
pub struct InsightView {
    request: Option<(Cif, DateRange)>,
    summary: Option<FinancialSummary>,
    ratios: ChartRatios,
    active_tab: BreakdownTab,
    status: LoadStatus,
    pending: Option<RequestId>,
}

impl InsightView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading the summary; `None` if this customer and period are
    /// already loaded or in flight
    pub fn begin_load(
        &mut self,
        cif: &Cif,
        range: DateRange,
        ids: &mut RequestIds,
    ) -> Option<RequestId> {
        let key = (cif.clone(), range);
        if self.request.as_ref() == Some(&key)
            && matches!(self.status, LoadStatus::Loading | LoadStatus::Ready)
        {
            return None;
        }
        self.request = Some(key);
        let id = ids.next_id();
        self.pending = Some(id);
        self.status = LoadStatus::Loading;
        Some(id)
    }

    pub fn retry(&mut self, ids: &mut RequestIds) -> Option<RequestId> {
        if !matches!(self.status, LoadStatus::Failed { .. }) {
            return None;
        }
        let (cif, range) = self.request.clone()?;
        self.status = LoadStatus::Idle;
        self.begin_load(&cif, range, ids)
    }

    /// Apply a finished aggregate; returns false when `id` is stale
    pub fn apply(
        &mut self,
        id: RequestId,
        outcome: Result<FinancialSummary, LoadFailure>,
    ) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(summary) => {
                self.ratios = ChartRatios::from_totals(summary.total_income, summary.total_expense);
                self.summary = Some(summary);
                self.status = LoadStatus::Ready;
            }
            Err(failure) => self.status = LoadStatus::failed(failure),
        }
        true
    }

    pub fn select_tab(&mut self, tab: BreakdownTab) {
        self.active_tab = tab;
    }

    pub fn toggle_tab(&mut self) {
        self.active_tab = match self.active_tab {
            BreakdownTab::Income => BreakdownTab::Expense,
            BreakdownTab::Expense => BreakdownTab::Income,
        };
    }

    pub fn active_tab(&self) -> BreakdownTab {
        self.active_tab
    }

    /// Breakdown list for the active tab; empty until loaded
    pub fn active_breakdown(&self) -> &[CategoryBreakdownEntry] {
        match (&self.summary, self.active_tab) {
            (Some(s), BreakdownTab::Income) => &s.income_breakdown,
            (Some(s), BreakdownTab::Expense) => &s.expense_breakdown,
            (None, _) => &[],
        }
    }

    pub fn summary(&self) -> Option<&FinancialSummary> {
        self.summary.as_ref()
    }

    pub fn ratios(&self) -> ChartRatios {
        self.ratios
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LoginView {
    username: String,
    password: String,
    show_password: bool,
    submitting: bool,
    error: Option<String>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn password_visible(&self) -> bool {
        self.show_password
    }

    /// Floating label sits above the field once it has text
    pub fn username_label_raised(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn password_label_raised(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password field contents as drawn: clear text when visible, one `*` per
    /// character otherwise
    pub fn password_text(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "*".repeat(self.password.chars().count())
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.username.trim().is_empty() && !self.password.is_empty()
    }

    /// Mark the form as submitted and hand out the credentials
    pub fn begin_submit(&mut self) -> Option<(String, String)> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some((self.username.trim().to_string(), self.password.clone()))
    }

    pub fn finish_success(&mut self) {
        self.submitting = false;
        self.password.clear();
    }

    pub fn finish_failure(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
