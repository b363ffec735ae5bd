//! SQLite-backed persistence for accounts.

use sqlx::sqlite::SqlitePool;

use crate::{
    error::AppError,
    models::account::{Account, NewAccount},
};

const CREATE_ACCOUNT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS account (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    number INTEGER NOT NULL UNIQUE,
    encrypted_password TEXT NOT NULL,
    balance INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)
"#;

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, encrypted_password, balance, created_at";

#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the account table if it does not exist yet.
    pub async fn init(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_ACCOUNT_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Inserts `account` and returns the stored row.
    ///
    /// A clash on the public number is reported as [`AppError::Conflict`] so
    /// callers can redraw the number and try again.
    pub async fn create_account(&self, account: &NewAccount) -> Result<Account, AppError> {
        let query = format!(
            "INSERT INTO account (first_name, last_name, number, encrypted_password, balance, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.number)
            .bind(&account.encrypted_password)
            .bind(account.balance)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(format!(
                    "account with number [{}] already exists",
                    account.number
                )),
                _ => AppError::Sqlx(e),
            })
    }

    pub async fn delete_account(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM account WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("account {} not found", id)));
        }
        Ok(())
    }

    /// Updates the mutable fields of an account. `id` and `number` never change.
    #[allow(dead_code)]
    pub async fn update_account(&self, account: &Account) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE account SET first_name = ?, last_name = ?, balance = ? WHERE id = ?",
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.balance)
        .bind(account.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("account {} not found", account.id)));
        }
        Ok(())
    }

    pub async fn get_account_by_id(&self, id: i64) -> Result<Account, AppError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?");

        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {} not found", id)))
    }

    pub async fn get_account_by_number(&self, number: i64) -> Result<Account, AppError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE number = ?");

        sqlx::query_as::<_, Account>(&query)
            .bind(number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("account with number [{}] not found", number))
            })
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY id");

        let accounts = sqlx::query_as::<_, Account>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }
}
