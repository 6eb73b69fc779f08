use axum::{Router, routing::post};

use super::handlers::upload_receipt;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_receipt))
}
