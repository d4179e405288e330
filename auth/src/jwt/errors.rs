use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Input is not shaped like a compact token at all.
    #[error("Token is malformed")]
    TokenMalformed,

    /// Bad signature, undecodable payload or expired claims.
    #[error("Token is invalid: {0}")]
    TokenInvalid(String),
}
