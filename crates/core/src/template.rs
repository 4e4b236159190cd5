//! Persisted template content and lifecycle state.
//!
//! A template row stores its content as an optional JSON text blob. An empty
//! blob means the template is still a draft; otherwise it must decode to a
//! [`TransformResult`]. Anything else is corrupt and is reported as such,
//! never mistaken for a draft.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a template name.
pub const MAX_TEMPLATE_NAME_LEN: usize = 200;

/// Maximum length for a template description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/* --------------------------------------------------------------------------
   Content
   -------------------------------------------------------------------------- */

/// Output of one ingest: the uploaded HTML verbatim, the email-safe rewrite,
/// and the diagnostics produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformResult {
    pub sanitized_original: String,
    pub transformed_html: String,
    pub errors: Vec<String>,
}

/// Lifecycle state derived from a template's stored content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateState {
    Draft,
    Populated(TransformResult),
}

impl TemplateState {
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn content(&self) -> Option<&TransformResult> {
        match self {
            Self::Draft => None,
            Self::Populated(result) => Some(result),
        }
    }
}

/// Encode a result as the JSON text stored in the template row.
pub fn serialize_content(result: &TransformResult) -> Result<String, CoreError> {
    serde_json::to_string(result)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize template content: {e}")))
}

/// Decode stored content. `id` names the template in the error.
pub fn parse_content(id: &str, content: &str) -> Result<TransformResult, CoreError> {
    serde_json::from_str(content).map_err(|e| CoreError::CorruptContent {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Derive the lifecycle state of template `id` from its stored content.
pub fn resolve_state(id: &str, content: Option<&str>) -> Result<TemplateState, CoreError> {
    match content {
        None => Ok(TemplateState::Draft),
        Some(text) if text.trim().is_empty() => Ok(TemplateState::Draft),
        Some(text) => parse_content(id, text).map(TemplateState::Populated),
    }
}

/* --------------------------------------------------------------------------
   Validation
   -------------------------------------------------------------------------- */

/// Validate a template name: non-empty and within length limit.
pub fn validate_template_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Template name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_TEMPLATE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Template name too long: {} chars (max {MAX_TEMPLATE_NAME_LEN})",
            name.chars().count()
        )));
    }
    Ok(())
}

/// Validate an optional description length.
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    if let Some(d) = description {
        if d.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "Description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
                d.chars().count()
            )));
        }
    }
    Ok(())
}
