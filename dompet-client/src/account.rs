//! Account snapshot loader for the home screen

use dompet_core::{format_grouped, short_name, AccountSnapshot, Cif};
use tracing::debug;

use crate::api::BankApi;
use crate::error::FetchError;

/// Fetch `/user` once and normalize it into an [`AccountSnapshot`].
/// The balance is stored pre-formatted with grouped digits.
pub async fn load_account(api: &dyn BankApi, cif: &Cif) -> Result<AccountSnapshot, FetchError> {
    let user = api.user(cif).await?.user;
    debug!(%cif, account_type = %user.account_type, "account loaded");

    Ok(AccountSnapshot {
        account_type: user.account_type,
        account_number: user.account_number.into(),
        balance: format_grouped(user.total_amount),
        holder_name: short_name(&user.name),
    })
}
