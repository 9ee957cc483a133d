//! dompet-client: banking API adapter, account loader, summary aggregator and fetch worker

pub mod account;
pub mod api;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod summary;
pub mod wire;

pub use account::load_account;
pub use api::{ApiConfig, BankApi, HttpBankApi};
pub use dispatch::{run_worker, FetchEvent, FetchKind, FetchRequest};
pub use error::FetchError;
pub use session::{login, logout};
pub use summary::{aggregate, build_summary, SummaryOptions};
