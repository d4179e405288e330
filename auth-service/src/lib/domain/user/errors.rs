use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Top-level error for all user persistence operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    /// Identifier is not in the storage format.
    #[error("Invalid user ID: {0}")]
    InvalidIdentifier(#[from] UserIdError),

    /// Record failed its structural check before persistence.
    #[error("User validation failed: {0}")]
    ValidationFailed(String),

    #[error("Email already exists: {0}")]
    DuplicateKey(String),

    /// No usable admin record matched. Also returned for stored records that
    /// fail their structural check.
    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<EmailError> for UserError {
    fn from(err: EmailError) -> Self {
        UserError::ValidationFailed(err.to_string())
    }
}

impl From<RoleError> for UserError {
    fn from(err: RoleError) -> Self {
        UserError::ValidationFailed(err.to_string())
    }
}
