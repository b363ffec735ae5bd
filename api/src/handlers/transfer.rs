use crate::{error::AppError, models::account::TransferRequest};

use super::AppJson;

/// Echoes the decoded request. Balances are not touched.
pub async fn transfer(
    AppJson(req): AppJson<TransferRequest>,
) -> Result<AppJson<TransferRequest>, AppError> {
    tracing::info!("Transfer of {} to account {} requested", req.amount, req.to_account);
    Ok(AppJson(req))
}
