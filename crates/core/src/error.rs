use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Every candidate reference collided with one already stored. The
    /// request is intact and the assignment can be retried later.
    #[error("Could not allocate a unique reference for request {request_id} after {attempts} attempts")]
    ReferenceExhausted { request_id: DbId, attempts: u32 },

    #[error("Internal error: {0}")]
    Internal(String),
}
