use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound (exclusive) for randomly drawn public account numbers.
const ACCOUNT_NUMBER_RANGE: u32 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    #[serde(skip)]
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// An account that has not been persisted yet and so has no id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Hashes `password` with a fresh salt and draws a random public number.
    pub fn new(first_name: &str, last_name: &str, password: &str) -> Result<Self, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let encrypted_password = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(NewAccount {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            number: random_account_number(),
            encrypted_password,
            balance: 0,
            created_at: Utc::now(),
        })
    }
}

impl Account {
    pub fn validate_password(&self, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.encrypted_password) else {
            tracing::error!("Stored password hash for account {} is malformed", self.id);
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

pub fn random_account_number() -> i64 {
    i64::from(OsRng.next_u32() % ACCOUNT_NUMBER_RANGE)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub number: i64,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}
