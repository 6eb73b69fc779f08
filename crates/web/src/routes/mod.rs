use axum::Router;

use crate::features;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/receipts", features::receipts::routes::routes())
        .nest("/users", features::transactions::routes::routes())
}
