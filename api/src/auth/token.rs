//! Issuing and validating signed account tokens.
//!
//! Tokens are HS256 JWTs carrying the account's public number and an expiry.
//! Validation is pinned to HS256: whatever algorithm the token header names,
//! anything else is rejected before the signature is looked at.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::account::Account};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub account_number: i64,
    /// Expiry as seconds since the Unix epoch.
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("signing secret must not be empty".into()));
        }
        if ttl_seconds <= 0 {
            return Err(AppError::Config("token lifetime must be positive".into()));
        }
        let ttl = Duration::try_seconds(ttl_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| AppError::Config("token lifetime is out of range".into()))?;

        // Expiry lives in `expiresAt`, not the registered `exp` claim, so it is
        // checked by hand after decoding.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, account: &Account) -> Result<String, AppError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Config("token lifetime is out of range".into()))?
            .timestamp();

        let claims = Claims {
            account_number: account.number,
            expires_at,
        };

        Ok(encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)?)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthenticated
            })?;

        if claims.expires_at <= Utc::now().timestamp() {
            tracing::debug!(
                "Token for account {} expired at {}",
                claims.account_number,
                claims.expires_at
            );
            return Err(AppError::Unauthenticated);
        }

        Ok(claims)
    }
}
