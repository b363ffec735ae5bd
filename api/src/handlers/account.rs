use axum::extract::{Path, State};

use crate::{
    error::AppError,
    models::account::{
        random_account_number, Account, CreateAccountRequest, DeleteAccountRequest,
        DeleteAccountResponse, NewAccount,
    },
    store::AccountStore,
    AppState,
};

use super::AppJson;

/// Attempts at drawing an unused public account number.
const CREATE_ATTEMPTS: usize = 3;

pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<AppJson<Vec<Account>>, AppError> {
    Ok(AppJson(state.store.list_accounts().await?))
}

pub async fn create_account(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAccountRequest>,
) -> Result<AppJson<Account>, AppError> {
    let new_account = NewAccount::new(&payload.first_name, &payload.last_name, &payload.password)?;

    let account =
        insert_with_fresh_number(&state.store, new_account, random_account_number).await?;
    tracing::info!("Created account {} with number {}", account.id, account.number);
    Ok(AppJson(account))
}

/// Inserts `new_account`, redrawing its number from `draw` whenever the store
/// reports a collision. Gives up with the last `Conflict` after
/// [`CREATE_ATTEMPTS`] inserts.
async fn insert_with_fresh_number(
    store: &AccountStore,
    mut new_account: NewAccount,
    mut draw: impl FnMut() -> i64,
) -> Result<Account, AppError> {
    let mut attempt = 1;
    loop {
        match store.create_account(&new_account).await {
            Err(AppError::Conflict(msg)) if attempt < CREATE_ATTEMPTS => {
                tracing::warn!("{}, drawing a new number", msg);
                new_account.number = draw();
                attempt += 1;
            }
            result => return result,
        }
    }
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<AppJson<Account>, AppError> {
    Ok(AppJson(state.store.get_account_by_id(id).await?))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<AppJson<DeleteAccountResponse>, AppError> {
    remove(&state, id).await
}

/// Collection-path delete; the target id travels in the body.
pub async fn delete_account_by_body(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DeleteAccountRequest>,
) -> Result<AppJson<DeleteAccountResponse>, AppError> {
    remove(&state, payload.id).await
}

async fn remove(state: &AppState, id: i64) -> Result<AppJson<DeleteAccountResponse>, AppError> {
    state.store.delete_account(id).await?;
    tracing::info!("Deleted account {}", id);
    Ok(AppJson(DeleteAccountResponse { deleted: id }))
}
