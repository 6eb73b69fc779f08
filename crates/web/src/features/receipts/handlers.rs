use axum::{
    Json,
    extract::{Multipart, State},
};
use storage::dto::receipt::UploadReceiptResponse;
use utoipa::ToSchema;

use crate::error::WebError;
use crate::state::AppState;

use super::services::{self, UploadForm};

/// Multipart body of a receipt upload
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadReceiptForm {
    #[schema(minimum = 1)]
    user_id: i64,
    #[schema(minimum = 1)]
    transaction_id: i64,
    /// Receipt photo
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/receipts/upload",
    request_body(content = UploadReceiptForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Receipt processed and transaction rescored", body = UploadReceiptResponse),
        (status = 400, description = "Invalid form or no items could be read from the receipt"),
        (status = 404, description = "Transaction not found for this user")
    ),
    tag = "receipts"
)]
pub async fn upload_receipt(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceiptResponse>, WebError> {
    let (request, image) = UploadForm::read(&mut multipart).await?.into_parts()?;

    tracing::info!(
        "Receipt upload for transaction {} of user {}",
        request.transaction_id,
        request.user_id
    );

    let response = services::process_upload(&state.processor, &request, &image).await?;

    Ok(Json(response))
}
