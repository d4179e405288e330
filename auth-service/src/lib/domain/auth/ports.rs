use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Authentication;
use crate::domain::auth::models::LoginRequest;
use crate::domain::user::models::User;

/// Port for the authentication entry points used by the inbound layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify admin credentials and issue a token.
    ///
    /// # Arguments
    /// * `request` - Email and plaintext password
    ///
    /// # Returns
    /// Authenticated user and signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password, or lookup failure
    /// * `TokenIssuanceFailed` - Token could not be signed
    async fn login(&self, request: LoginRequest) -> Result<Authentication, AuthError>;

    /// Resolve a bearer token back to its admin user.
    ///
    /// # Arguments
    /// * `token` - Bearer token string
    ///
    /// # Returns
    /// Admin user named by the token subject
    ///
    /// # Errors
    /// * `Unauthorized` - Token is malformed, invalid, expired, or names no admin
    async fn validate_token(&self, token: &str) -> Result<User, AuthError>;
}
