use thiserror::Error;

/// Error taxonomy for all core marketplace operations.
///
/// Every activity returns exactly one of these on failure. Errors are
/// terminal for the call; the core never retries on its own, and any open
/// transaction is rolled back before the error surfaces.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or deal-type-inconsistent input. Recoverable by the caller
    /// resubmitting corrected input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Caller is not the entity's owner or party. No state change occurred.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Operation is structurally disallowed given current entity status
    /// (wrong state for a transition, duplicate active bid, non-alternating
    /// negotiation turn, lost acceptance race). No state change occurred.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
