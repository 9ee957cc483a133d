//! Login and logout against the backend

use dompet_core::view_state::INVALID_CREDENTIALS;
use dompet_core::Cif;
use tracing::{info, warn};

use crate::api::BankApi;
use crate::error::FetchError;
use crate::wire::Credentials;

/// Exchange username/password for the customer's CIF.
///
/// A 4xx answer or a reply without a usable `cif` is an [`FetchError::Auth`];
/// network trouble and 5xx stay as they are so the caller can tell them apart.
pub async fn login(api: &dyn BankApi, username: &str, password: &str) -> Result<Cif, FetchError> {
    let credentials = Credentials::new(username, password);
    let resp = match api.login(&credentials).await {
        Ok(resp) => resp,
        Err(FetchError::Status { status, .. }) if (400..500).contains(&status) => {
            warn!(status, "login rejected");
            return Err(FetchError::Auth(INVALID_CREDENTIALS.to_string()));
        }
        Err(e) => return Err(e),
    };

    let cif = resp
        .cif
        .map(String::from)
        .and_then(|raw| Cif::parse(raw).ok())
        .ok_or_else(|| FetchError::Auth(INVALID_CREDENTIALS.to_string()))?;
    info!("login succeeded");
    Ok(cif)
}

/// Returns the backend's logout message (empty if it sent none)
pub async fn logout(api: &dyn BankApi) -> Result<String, FetchError> {
    let resp = api.logout().await?;
    Ok(resp.message.unwrap_or_default())
}
