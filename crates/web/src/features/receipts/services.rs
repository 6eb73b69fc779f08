use axum::extract::Multipart;
use receipts::ReceiptProcessor;
use storage::dto::receipt::{UploadReceiptRequest, UploadReceiptResponse};
use validator::Validate;

use crate::error::{WebError, WebResult};

/// Fields collected from an upload form. Unknown fields are skipped.
#[derive(Debug, Default)]
pub struct UploadForm {
    user_id: Option<i64>,
    transaction_id: Option<i64>,
    image: Option<Vec<u8>>,
}

impl UploadForm {
    pub async fn read(multipart: &mut Multipart) -> WebResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "user_id" => form.user_id = Some(parse_id("user_id", &field.text().await?)?),
                "transaction_id" => {
                    form.transaction_id = Some(parse_id("transaction_id", &field.text().await?)?)
                }
                "file" => form.image = Some(field.bytes().await?.to_vec()),
                _ => tracing::debug!("Ignoring multipart field '{}'", name),
            }
        }

        Ok(form)
    }

    /// Checks that every field is present and valid.
    pub fn into_parts(self) -> WebResult<(UploadReceiptRequest, Vec<u8>)> {
        let request = UploadReceiptRequest {
            user_id: self.user_id.ok_or_else(|| missing("user_id"))?,
            transaction_id: self.transaction_id.ok_or_else(|| missing("transaction_id"))?,
        };
        request.validate()?;

        let image = self.image.ok_or_else(|| missing("file"))?;
        if image.is_empty() {
            return Err(WebError::BadRequest("Uploaded file is empty".to_string()));
        }

        Ok((request, image))
    }
}

fn parse_id(field: &str, raw: &str) -> WebResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| WebError::BadRequest(format!("{} must be an integer", field)))
}

fn missing(field: &str) -> WebError {
    WebError::BadRequest(format!("Missing form field '{}'", field))
}

pub async fn process_upload(
    processor: &ReceiptProcessor,
    request: &UploadReceiptRequest,
    image: &[u8],
) -> WebResult<UploadReceiptResponse> {
    Ok(processor
        .process_upload(request.user_id, request.transaction_id, image)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(user_id: Option<i64>, transaction_id: Option<i64>, image: Option<&[u8]>) -> UploadForm {
        UploadForm {
            user_id,
            transaction_id,
            image: image.map(<[u8]>::to_vec),
        }
    }

    #[test]
    fn test_complete_form_is_accepted() {
        let (request, image) = form(Some(1), Some(42), Some(b"jpeg")).into_parts().unwrap();

        assert_eq!(request.user_id, 1);
        assert_eq!(request.transaction_id, 42);
        assert_eq!(image, b"jpeg");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(matches!(
            form(None, Some(1), Some(b"x")).into_parts(),
            Err(WebError::BadRequest(msg)) if msg.contains("user_id")
        ));
        assert!(matches!(
            form(Some(1), None, Some(b"x")).into_parts(),
            Err(WebError::BadRequest(msg)) if msg.contains("transaction_id")
        ));
        assert!(matches!(
            form(Some(1), Some(1), None).into_parts(),
            Err(WebError::BadRequest(msg)) if msg.contains("file")
        ));
    }

    #[test]
    fn test_ids_below_one_fail_validation() {
        assert!(matches!(
            form(Some(0), Some(1), Some(b"x")).into_parts(),
            Err(WebError::Validation(_))
        ));
        assert!(matches!(
            form(Some(1), Some(-3), Some(b"x")).into_parts(),
            Err(WebError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        assert!(matches!(
            form(Some(1), Some(1), Some(b"")).into_parts(),
            Err(WebError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("user_id", " 17 ").unwrap(), 17);
        assert!(parse_id("user_id", "abc").is_err());
        assert!(parse_id("user_id", "").is_err());
    }
}
