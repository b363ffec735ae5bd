//! Middleware binding a request's token to the account named in its path.

use axum::{
    extract::{rejection::PathRejection, Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, AppState};

/// Header carrying the signed token.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Admits the request only when its token is valid and was issued for the
/// account whose id appears in the path. Every denial is a 403 with a generic
/// body, so callers cannot tell an expired token from a forged one.
pub async fn require_account_owner(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    request: Request,
    next: Next,
) -> Response {
    tracing::debug!("Checking token for {}", request.uri().path());

    let Some(token) = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        tracing::debug!("Denied: no token header");
        return AppError::PERMISSION_DENIED.into_response();
    };

    let Ok(claims) = state.tokens.validate(token) else {
        return AppError::PERMISSION_DENIED.into_response();
    };

    let Ok(Path(id)) = path else {
        tracing::debug!("Denied: path id is not numeric");
        return AppError::PERMISSION_DENIED.into_response();
    };

    let account = match state.store.get_account_by_id(id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::debug!("Denied: could not resolve account {}: {}", id, e);
            return AppError::INVALID_TOKEN.into_response();
        }
    };

    if account.number != claims.account_number {
        tracing::debug!(
            "Denied: token for number {} used on account {}",
            claims.account_number,
            id
        );
        return AppError::PERMISSION_DENIED.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::token::TokenService,
        models::account::{Account, NewAccount},
        store::tests::memory_store,
    };
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn admitted() -> &'static str {
        "admitted"
    }

    async fn setup(count: i64) -> (Router, AppState, Vec<Account>) {
        let store = memory_store().await;
        let mut accounts = Vec::new();
        for i in 0..count {
            let mut new = NewAccount::new("Jane", "Doe", "secret").unwrap();
            new.number = 1000 + i;
            accounts.push(store.create_account(&new).await.unwrap());
        }

        let state = AppState {
            store,
            tokens: TokenService::new("gate-secret", 600).unwrap(),
        };
        let app = Router::new()
            .route(
                "/account/:id",
                get(admitted)
                    .route_layer(from_fn_with_state(state.clone(), require_account_owner)),
            )
            .with_state(state.clone());

        (app, state, accounts)
    }

    async fn call(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn owner_is_admitted() {
        let (app, state, accounts) = setup(1).await;
        let token = state.tokens.issue(&accounts[0]).unwrap();

        let uri = format!("/account/{}", accounts[0].id);
        let (status, body) = call(&app, &uri, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admitted");
    }

    #[tokio::test]
    async fn every_mismatched_pair_is_denied() {
        let (app, state, accounts) = setup(4).await;

        for holder in &accounts {
            let token = state.tokens.issue(holder).unwrap();
            for target in accounts.iter().filter(|a| a.id != holder.id) {
                let (status, body) =
                    call(&app, &format!("/account/{}", target.id), Some(&token)).await;
                assert_eq!(status, StatusCode::FORBIDDEN, "{} -> {}", holder.id, target.id);
                assert!(body.contains("permission denied"));
            }
        }
    }

    #[tokio::test]
    async fn missing_token_is_denied() {
        let (app, _, accounts) = setup(1).await;
        let (status, body) = call(&app, &format!("/account/{}", accounts[0].id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("permission denied"));
    }

    #[tokio::test]
    async fn invalid_token_is_denied() {
        let (app, _, accounts) = setup(1).await;
        let foreign = TokenService::new("other-secret", 600)
            .unwrap()
            .issue(&accounts[0])
            .unwrap();

        for token in ["garbage", foreign.as_str()] {
            let (status, body) =
                call(&app, &format!("/account/{}", accounts[0].id), Some(token)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert!(body.contains("permission denied"));
        }
    }

    #[tokio::test]
    async fn non_numeric_id_is_denied() {
        let (app, state, accounts) = setup(1).await;
        let token = state.tokens.issue(&accounts[0]).unwrap();

        let (status, _) = call(&app, "/account/abc", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_account_is_an_invalid_token() {
        let (app, state, accounts) = setup(1).await;
        let token = state.tokens.issue(&accounts[0]).unwrap();

        let (status, body) = call(&app, "/account/9999", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("invalid token"));
    }
}
