use axum::{Router, routing::get};

use super::handlers::get_transaction_eco;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/:user_id/transactions/:transaction_id/eco",
        get(get_transaction_eco),
    )
}
