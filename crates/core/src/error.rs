#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Nothing (or nothing usable) was supplied to an ingest operation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Stored template content does not have the expected shape.
    #[error("Corrupt content for template {id}: {reason}")]
    CorruptContent { id: String, reason: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Entitlement required: {0}")]
    EntitlementRequired(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
