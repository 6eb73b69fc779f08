use axum::{
    Json,
    extract::{Path, State},
};
use storage::dto::eco::EcoSummaryResponse;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/transactions/{transaction_id}/eco",
    params(
        ("user_id" = i64, Path, description = "Owner of the transaction"),
        ("transaction_id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Eco score, cashback and scored receipt items", body = EcoSummaryResponse),
        (status = 404, description = "Transaction not found for this user")
    ),
    tag = "transactions"
)]
pub async fn get_transaction_eco(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(i64, i64)>,
) -> Result<Json<EcoSummaryResponse>, WebError> {
    let summary = services::get_eco_summary(state.db.pool(), user_id, transaction_id).await?;

    Ok(Json(summary))
}
