//! Repository for the `templates` table.

use ezemailer_core::types::{DbId, ExternalId};
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template};

const COLUMNS: &str =
    "id, external_id, owner_id, name, description, content, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a draft template (no content).
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (external_id, owner_id, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(input.external_id)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: ExternalId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE external_id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole content blob. Last write wins.
    ///
    /// Returns `None` if no row with the given `external_id` exists.
    pub async fn update_content(
        pool: &PgPool,
        external_id: ExternalId,
        content: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET content = $2
             WHERE external_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(external_id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// List a user's templates, most recently updated first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates WHERE owner_id = $1 ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a template. Returns `true` if a row was removed.
    pub async fn delete_by_external_id(
        pool: &PgPool,
        external_id: ExternalId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE external_id = $1")
            .bind(external_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
