//! Template lifecycle: draft creation, population from uploads, live-edit
//! saves, and loading with state resolution.
//!
//! Every operation is scoped to the owning user. A template that exists but
//! belongs to someone else is reported exactly like a missing one. Content is
//! always replaced as a whole; concurrent writers resolve last-write-wins.

use std::sync::Arc;

use ezemailer_core::error::CoreError;
use ezemailer_core::ingest::{ingest, IngestSource};
use ezemailer_core::template::{
    resolve_state, serialize_content, validate_description, validate_template_name,
    TemplateState, TransformResult,
};
use ezemailer_core::types::{DbId, ExternalId};
use ezemailer_db::models::template::{CreateTemplate, Template};
use ezemailer_db::store::TemplateStore;
use uuid::Uuid;

use crate::error::AppResult;

/// A template row together with its resolved lifecycle state.
#[derive(Debug, Clone)]
pub struct TemplateView {
    pub template: Template,
    pub state: TemplateState,
}

pub struct TemplateLifecycle {
    store: Arc<dyn TemplateStore>,
    max_upload_bytes: usize,
}

fn not_found(external_id: ExternalId) -> CoreError {
    CoreError::NotFound {
        entity: "Template",
        id: external_id.to_string(),
    }
}

impl TemplateLifecycle {
    pub fn new(store: Arc<dyn TemplateStore>, max_upload_bytes: usize) -> Self {
        Self {
            store,
            max_upload_bytes,
        }
    }

    /// Create an empty draft owned by `owner`.
    pub async fn create_draft(
        &self,
        owner: DbId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Template> {
        let name = name.trim();
        validate_template_name(name)?;
        validate_description(description)?;

        let input = CreateTemplate {
            external_id: Uuid::new_v4(),
            owner_id: owner,
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        let template = self.store.create(&input).await?;
        tracing::info!(external_id = %template.external_id, owner, "Draft template created");
        Ok(template)
    }

    /// Load a template and resolve its state. Corrupt content is an error,
    /// never a draft.
    pub async fn load(&self, owner: DbId, external_id: ExternalId) -> AppResult<TemplateView> {
        let template = self.owned(owner, external_id).await?;
        let state = resolve_state(&external_id.to_string(), template.content.as_deref())?;
        Ok(TemplateView { template, state })
    }

    /// Ingest an upload and store the result as the template's content.
    pub async fn populate(
        &self,
        owner: DbId,
        external_id: ExternalId,
        source: IngestSource,
    ) -> AppResult<TemplateView> {
        let template = self.owned(owner, external_id).await?;
        let result = ingest(source, self.max_upload_bytes)?;
        let view = self.write(template.external_id, result).await?;
        tracing::info!(
            %external_id,
            diagnostics = view.state.content().map_or(0, |c| c.errors.len()),
            "Template populated"
        );
        Ok(view)
    }

    /// Save a full transform result, as produced by a live edit.
    pub async fn replace_content(
        &self,
        owner: DbId,
        external_id: ExternalId,
        result: TransformResult,
    ) -> AppResult<TemplateView> {
        let template = self.owned(owner, external_id).await?;
        let view = self.write(template.external_id, result).await?;
        tracing::info!(%external_id, "Template content replaced");
        Ok(view)
    }

    pub async fn list(&self, owner: DbId) -> AppResult<Vec<Template>> {
        Ok(self.store.list_by_owner(owner).await?)
    }

    pub async fn delete(&self, owner: DbId, external_id: ExternalId) -> AppResult<()> {
        self.owned(owner, external_id).await?;
        if !self.store.delete_by_external_id(external_id).await? {
            return Err(not_found(external_id).into());
        }
        tracing::info!(%external_id, "Template deleted");
        Ok(())
    }

    async fn owned(&self, owner: DbId, external_id: ExternalId) -> AppResult<Template> {
        let template = self
            .store
            .get_by_external_id(external_id)
            .await?
            .filter(|t| t.owner_id == owner)
            .ok_or_else(|| not_found(external_id))?;
        Ok(template)
    }

    async fn write(
        &self,
        external_id: ExternalId,
        result: TransformResult,
    ) -> AppResult<TemplateView> {
        let content = serialize_content(&result)?;
        let template = self
            .store
            .update_content(external_id, &content)
            .await?
            .ok_or_else(|| not_found(external_id))?;
        Ok(TemplateView {
            template,
            state: TemplateState::Populated(result),
        })
    }
}
