//! Stateless validator upload: transform an HTML upload without saving it.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use ezemailer_core::error::CoreError;
use ezemailer_core::ingest::{ingest, IngestSource};
use ezemailer_core::template::TransformResult;

use crate::error::{AppError, AppResult};
use crate::middleware::entitlement::RequireEntitlement;
use crate::state::AppState;

/// Read an upload from a multipart body.
///
/// A `file` part is taken as the uploaded document and an `html` part as
/// pasted text. A non-empty part always beats an empty one, and a non-empty
/// file beats pasted text. When neither is present the source is empty, which
/// ingest rejects with the "No file uploaded." message.
pub(crate) async fn read_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> AppResult<IngestSource> {
    let mut source: Option<IngestSource> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let candidate = match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.html").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
                IngestSource::File {
                    file_name,
                    bytes: bytes.to_vec(),
                }
            }
            Some("html") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
                IngestSource::Text(text)
            }
            _ => continue,
        };

        if replaces(source.as_ref(), &candidate) {
            source = Some(candidate);
        }
    }

    Ok(source.unwrap_or_else(|| IngestSource::Text(String::new())))
}

fn replaces(current: Option<&IngestSource>, candidate: &IngestSource) -> bool {
    match current {
        None => true,
        Some(current) if current.is_empty() => true,
        Some(IngestSource::Text(_)) => {
            matches!(candidate, IngestSource::File { .. }) && !candidate.is_empty()
        }
        Some(IngestSource::File { .. }) => false,
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Core(CoreError::PayloadTooLarge { limit: max_bytes })
    } else {
        AppError::BadRequest(err.to_string())
    }
}

/// POST /api/v1/validator/upload
///
/// Responds with the bare transform result
/// (`sanitizedOriginal`, `transformedHtml`, `errors`).
pub async fn upload(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<TransformResult>> {
    state.ingest_limiter.check(user.user_id)?;

    let max_bytes = state.config.max_upload_bytes;
    let source = read_upload(&mut multipart, max_bytes).await?;
    let result = ingest(source, max_bytes)?;
    tracing::debug!(
        user_id = user.user_id,
        diagnostics = result.errors.len(),
        "Validator upload transformed"
    );

    Ok(Json(result))
}
