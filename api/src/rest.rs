use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{
    auth::gate::require_account_owner,
    handlers::{account, auth, method_not_allowed, transfer},
    AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login).fallback(method_not_allowed))
        .route(
            "/account",
            get(account::list_accounts)
                .post(account::create_account)
                .delete(account::delete_account_by_body)
                .fallback(method_not_allowed),
        )
        .route(
            "/account/:id",
            get(account::get_account)
                .delete(account::delete_account)
                .route_layer(from_fn_with_state(state.clone(), require_account_owner))
                .fallback(method_not_allowed),
        )
        .route(
            "/transfer",
            post(transfer::transfer).fallback(method_not_allowed),
        )
        .with_state(state)
}
