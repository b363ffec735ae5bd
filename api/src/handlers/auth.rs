use axum::extract::State;

use crate::{
    error::AppError,
    models::account::{LoginRequest, LoginResponse},
    AppState,
};

use super::AppJson;

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<AppJson<LoginResponse>, AppError> {
    let account = state.store.get_account_by_number(payload.number).await?;

    if !account.validate_password(&payload.password) {
        tracing::info!("Failed login for account number {}", payload.number);
        return Err(AppError::LoginFail);
    }

    let token = state.tokens.issue(&account)?;
    tracing::info!("Issued token for account number {}", account.number);

    Ok(AppJson(LoginResponse {
        number: account.number,
        token,
    }))
}
