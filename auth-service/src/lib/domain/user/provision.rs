use auth::PasswordHasher;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Seed an admin account.
///
/// Validates the email, hashes the password and stores the user through the
/// repository, which enforces email uniqueness.
///
/// # Arguments
/// * `repository` - Target repository
/// * `hasher` - Credential codec used for the stored hash
/// * `email` - Raw email address
/// * `password` - Plaintext password
///
/// # Returns
/// Stored admin user
///
/// # Errors
/// * `ValidationFailed` - Email is malformed, password is empty, or hashing failed
/// * `DuplicateKey` - Email is already registered
/// * `DatabaseError` - Database operation failed
pub async fn create_admin<R>(
    repository: &R,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<User, UserError>
where
    R: UserRepository + ?Sized,
{
    let email = EmailAddress::new(email.trim().to_string())?;

    if password.is_empty() {
        return Err(UserError::ValidationFailed("password is required".to_string()));
    }

    let password_hash = hasher
        .hash(password)
        .map_err(|e| UserError::ValidationFailed(e.to_string()))?;

    let user = repository
        .create(NewUser::new(email, password_hash, Role::Admin))
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Admin user created");

    Ok(user)
}
