use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};

use crate::errors::AppError;

/// An uploaded resume with its data and metadata.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Parsed form fields from the `/analyze` multipart upload.
#[derive(Debug)]
pub struct AnalyzeForm {
    pub file: UploadedFile,
    pub job_description: Option<String>,
}

fn form_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::Validation(format!("Failed to read form data: {}", err.body_text()))
    }
}

/// Parse the upload form. The resume may arrive as `file` or `resume`, the
/// job description as `job_description` or `jd`; unknown fields are skipped.
pub async fn parse_analyze_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<AnalyzeForm, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" | "resume" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = read_limited(field, max_bytes).await?;
                file = Some(UploadedFile { filename, data });
            }
            "job_description" | "jd" => {
                let text = field.text().await.map_err(|e| form_error(e, max_bytes))?;
                let text = text.trim();
                if !text.is_empty() {
                    job_description = Some(text.to_string());
                }
            }
            _ => {
                // Drain unknown fields
                field.bytes().await.map_err(|e| form_error(e, max_bytes))?;
            }
        }
    }

    let file = file.ok_or_else(|| {
        AppError::Validation("No file uploaded. Send the resume in a 'file' form field.".into())
    })?;

    Ok(AnalyzeForm {
        file,
        job_description,
    })
}

/// Buffers a file field, failing as soon as it grows past `max_bytes`.
async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<Bytes, AppError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| form_error(e, max_bytes))? {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge { limit: max_bytes });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data.freeze())
}
