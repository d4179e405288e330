use async_trait::async_trait;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Persistence operations for the user aggregate.
///
/// Implementations own the uniqueness constraint on email and the mapping from
/// stored records to [`User`] values.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Validate and persist a new user.
    ///
    /// # Arguments
    /// * `user` - User awaiting persistence
    ///
    /// # Returns
    /// Stored user carrying its storage-assigned identifier
    ///
    /// # Errors
    /// * `ValidationFailed` - User failed its build step
    /// * `DuplicateKey` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve the admin user with this email.
    ///
    /// # Arguments
    /// * `email` - Email address string
    ///
    /// # Returns
    /// Matching admin user
    ///
    /// # Errors
    /// * `NotFound` - No admin with this email, or the stored record is malformed
    /// * `DatabaseError` - Database operation failed
    async fn find_admin_by_email(&self, email: &str) -> Result<User, UserError>;

    /// Retrieve the admin user with this identifier.
    ///
    /// # Arguments
    /// * `id` - User ID as presented by the caller
    ///
    /// # Returns
    /// Matching admin user
    ///
    /// # Errors
    /// * `InvalidIdentifier` - `id` is not a UUID
    /// * `NotFound` - No admin with this ID, or the stored record is malformed
    /// * `DatabaseError` - Database operation failed
    async fn find_admin_by_id(&self, id: &str) -> Result<User, UserError>;
}
