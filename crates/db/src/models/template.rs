//! Template entity model and DTOs.

use ezemailer_core::types::{DbId, ExternalId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `templates` table.
///
/// `content` holds the JSON-encoded transform result and is `None` while
/// the template is a draft.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub external_id: ExternalId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub content: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new (draft) template.
#[derive(Debug, Clone)]
pub struct CreateTemplate {
    pub external_id: ExternalId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
}
