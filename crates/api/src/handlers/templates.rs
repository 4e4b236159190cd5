//! Handlers for the `/templates` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ezemailer_core::error::CoreError;
use ezemailer_core::preview::PreviewVariant;
use ezemailer_core::template::{TemplateState, TransformResult};
use ezemailer_core::types::ExternalId;
use ezemailer_db::models::template::Template;
use serde::{Deserialize, Serialize};

use super::validator::read_upload;
use crate::error::{AppError, AppResult};
use crate::lifecycle::TemplateView;
use crate::middleware::entitlement::RequireEntitlement;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: Option<String>,
}

/// A template with its lifecycle state and, once populated, its content.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    #[serde(flatten)]
    pub template: Template,
    pub state: &'static str,
    pub content: Option<TransformResult>,
}

impl From<TemplateView> for TemplateResponse {
    fn from(view: TemplateView) -> Self {
        let (state, content) = match view.state {
            TemplateState::Draft => ("draft", None),
            TemplateState::Populated(result) => ("populated", Some(result)),
        };
        Self {
            template: view.template,
            state,
            content,
        }
    }
}

/// GET /api/v1/templates
pub async fn list(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    let templates = state.lifecycle().list(user.user_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates
pub async fn create(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TemplateResponse>>)> {
    let template = state
        .lifecycle()
        .create_draft(user.user_id, &input.name, input.description.as_deref())
        .await?;
    let view = TemplateView {
        template,
        state: TemplateState::Draft,
    };
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: view.into() }),
    ))
}

/// GET /api/v1/templates/{id}
pub async fn get(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
) -> AppResult<Json<DataResponse<TemplateResponse>>> {
    let view = state.lifecycle().load(user.user_id, external_id).await?;
    Ok(Json(DataResponse { data: view.into() }))
}

/// DELETE /api/v1/templates/{id}
pub async fn delete(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
) -> AppResult<StatusCode> {
    state.lifecycle().delete(user.user_id, external_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/upload
pub async fn upload(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<TemplateResponse>>> {
    state.ingest_limiter.check(user.user_id)?;

    let source = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let view = state
        .lifecycle()
        .populate(user.user_id, external_id, source)
        .await?;
    Ok(Json(DataResponse { data: view.into() }))
}

/// PUT /api/v1/templates/{id}/content
///
/// Save a live edit. The body is a complete transform result and replaces
/// the stored content as a whole.
pub async fn replace_content(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    Json(result): Json<TransformResult>,
) -> AppResult<Json<DataResponse<TemplateResponse>>> {
    let view = state
        .lifecycle()
        .replace_content(user.user_id, external_id, result)
        .await?;
    Ok(Json(DataResponse { data: view.into() }))
}

/// GET /api/v1/templates/{id}/download/{variant}
///
/// `variant` is `original` or `transformed`. Drafts have nothing to
/// download and answer 409.
pub async fn download(
    RequireEntitlement(user): RequireEntitlement,
    State(state): State<AppState>,
    Path((external_id, variant)): Path<(ExternalId, String)>,
) -> AppResult<Response> {
    let variant = PreviewVariant::parse(&variant)?;
    let view = state.lifecycle().load(user.user_id, external_id).await?;

    let content = view.state.content().ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Template has no content yet. Upload HTML first.".into(),
        ))
    })?;
    let body = variant.render(content);
    let disposition = format!("attachment; filename=\"{}\"", variant.download_filename());

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
