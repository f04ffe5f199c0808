use pdf_text_prep::RawDocument;
use worker::{FormEntry, Request};

use crate::error::ApiError;
use crate::models::{MAX_UPLOAD_BYTES, UPLOAD_FIELD};

pub fn ensure_multipart(content_type: Option<&str>) -> Result<(), ApiError> {
    let is_multipart = content_type.is_some_and(|value| {
        value
            .trim()
            .to_ascii_lowercase()
            .starts_with("multipart/form-data")
    });
    if is_multipart {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "expected a multipart/form-data upload".to_string(),
        ))
    }
}

/// Rejects oversize bodies from the declared length before reading them.
/// A missing or unparsable header is left to the post-read check.
pub fn ensure_declared_size(content_length: Option<&str>) -> Result<(), ApiError> {
    match content_length.and_then(|value| value.trim().parse::<usize>().ok()) {
        Some(length) => ensure_file_size(length),
        None => Ok(()),
    }
}

pub fn ensure_file_size(length: usize) -> Result<(), ApiError> {
    if length > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge(format!(
            "upload is {length} bytes; the limit is {MAX_UPLOAD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Pulls the uploaded file out of a multipart request.
pub async fn read_upload(req: &mut Request) -> Result<RawDocument, ApiError> {
    let content_type = req.headers().get("Content-Type")?;
    ensure_multipart(content_type.as_deref())?;
    ensure_declared_size(req.headers().get("Content-Length")?.as_deref())?;

    let form = req
        .form_data()
        .await
        .map_err(|error| ApiError::BadRequest(format!("invalid multipart body: {error}")))?;
    let Some(FormEntry::File(file)) = form.get(UPLOAD_FIELD) else {
        return Err(ApiError::BadRequest(format!(
            "missing file in form field '{UPLOAD_FIELD}'"
        )));
    };

    ensure_file_size(file.size())?;
    let bytes = file.bytes().await?;
    ensure_file_size(bytes.len())?;

    Ok(RawDocument::new(bytes)
        .with_file_name(file.name())
        .with_content_type(file.type_()))
}
