//! Storage seam for template records.
//!
//! The lifecycle controller talks to templates through [`TemplateStore`] so
//! it can run against Postgres in production and an in-memory store in tests.
//! Every method touches a single row and is atomic on its own.

use async_trait::async_trait;
use ezemailer_core::types::{DbId, ExternalId};
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template};
use crate::repositories::TemplateRepo;

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn create(&self, input: &CreateTemplate) -> Result<Template, sqlx::Error>;

    async fn get_by_external_id(
        &self,
        external_id: ExternalId,
    ) -> Result<Option<Template>, sqlx::Error>;

    /// Replace the content blob, returning the updated row.
    async fn update_content(
        &self,
        external_id: ExternalId,
        content: &str,
    ) -> Result<Option<Template>, sqlx::Error>;

    async fn list_by_owner(&self, owner_id: DbId) -> Result<Vec<Template>, sqlx::Error>;

    async fn delete_by_external_id(&self, external_id: ExternalId) -> Result<bool, sqlx::Error>;
}

/// [`TemplateStore`] backed by the `templates` table.
#[derive(Debug, Clone)]
pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn create(&self, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        TemplateRepo::create(&self.pool, input).await
    }

    async fn get_by_external_id(
        &self,
        external_id: ExternalId,
    ) -> Result<Option<Template>, sqlx::Error> {
        TemplateRepo::find_by_external_id(&self.pool, external_id).await
    }

    async fn update_content(
        &self,
        external_id: ExternalId,
        content: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let updated = TemplateRepo::update_content(&self.pool, external_id, content).await?;
        tracing::debug!(%external_id, bytes = content.len(), "Template content written");
        Ok(updated)
    }

    async fn list_by_owner(&self, owner_id: DbId) -> Result<Vec<Template>, sqlx::Error> {
        TemplateRepo::list_by_owner(&self.pool, owner_id).await
    }

    async fn delete_by_external_id(&self, external_id: ExternalId) -> Result<bool, sqlx::Error> {
        TemplateRepo::delete_by_external_id(&self.pool, external_id).await
    }
}
