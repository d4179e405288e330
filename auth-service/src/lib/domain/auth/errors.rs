use auth::JwtError;
use thiserror::Error;

/// Errors surfaced by the authentication entry points.
///
/// Lookup and verification causes are deliberately not represented: every
/// failed login is `InvalidCredentials` and every rejected token is
/// `Unauthorized`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    /// Signing failed; a configuration or crypto fault, not a credential problem.
    #[error("token issuance failed: {0}")]
    TokenIssuanceFailed(#[source] JwtError),
}
