use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenMaker;
use chrono::Duration;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Authentication;
use crate::domain::auth::models::LoginRequest;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Domain service implementation for login and token validation.
///
/// Holds no mutable state; one instance is shared by every request task.
pub struct AuthService<UR, TM>
where
    UR: UserRepository,
    TM: TokenMaker,
{
    repository: Arc<UR>,
    token_maker: Arc<TM>,
    password_hasher: PasswordHasher,
    secret: Vec<u8>,
    token_ttl: Duration,
}

impl<UR, TM> AuthService<UR, TM>
where
    UR: UserRepository,
    TM: TokenMaker,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_maker` - Token signing implementation
    /// * `secret` - Symmetric signing secret
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Configured authentication service instance
    pub fn new(
        repository: Arc<UR>,
        token_maker: Arc<TM>,
        secret: impl Into<Vec<u8>>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            token_maker,
            password_hasher: PasswordHasher::new(),
            secret: secret.into(),
            token_ttl,
        }
    }
}

#[async_trait]
impl<UR, TM> AuthServicePort for AuthService<UR, TM>
where
    UR: UserRepository,
    TM: TokenMaker,
{
    async fn login(&self, request: LoginRequest) -> Result<Authentication, AuthError> {
        let user = self
            .repository
            .find_admin_by_email(&request.email)
            .await
            .map_err(|e| {
                match &e {
                    UserError::DatabaseError(_) => {
                        tracing::warn!(error = %e, "Admin lookup failed during login")
                    }
                    _ => tracing::debug!(error = %e, "Admin lookup failed during login"),
                }
                self.password_hasher.verify_decoy(&request.password);
                AuthError::InvalidCredentials
            })?;

        if !self
            .password_hasher
            .verify(&request.password, &user.password_hash)
        {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::for_subject(user.id, self.token_ttl);
        let token = self
            .token_maker
            .create_token(&claims, &self.secret)
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user.id, "Token signing failed");
                AuthError::TokenIssuanceFailed(e)
            })?;

        tracing::info!(user_id = %user.id, "Admin logged in");

        Ok(Authentication { user, token })
    }

    async fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .token_maker
            .verify_token(token, &self.secret)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::Unauthorized
            })?;

        self.repository
            .find_admin_by_id(&claims.sub)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, subject = %claims.sub, "Token subject did not resolve");
                AuthError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use auth::JwtError;
    use auth::JwtMaker;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::NewUser;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::UserId;
    use crate::user::errors::UserIdError;

    const SECRET: &str = "test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_admin_by_email(&self, email: &str) -> Result<User, UserError>;
            async fn find_admin_by_id(&self, id: &str) -> Result<User, UserError>;
        }
    }

    mock! {
        pub TestTokenMaker {}

        impl TokenMaker for TestTokenMaker {
            fn create_token(&self, claims: &Claims, secret: &[u8]) -> Result<String, JwtError>;
            fn verify_token(&self, token: &str, secret: &[u8]) -> Result<Claims, JwtError>;
        }
    }

    fn admin_with_password(password: &str) -> User {
        let password_hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");

        NewUser::new(
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash,
            Role::Admin,
        )
        .into_user(UserId::new(), Utc::now())
    }

    fn service<TM: TokenMaker>(
        repository: MockTestUserRepository,
        token_maker: TM,
    ) -> AuthService<MockTestUserRepository, TM> {
        AuthService::new(
            Arc::new(repository),
            Arc::new(token_maker),
            SECRET,
            Duration::hours(24),
        )
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let user = admin_with_password("secret123");
        let user_id = user.id;

        let returned_user = user.clone();
        repository
            .expect_find_admin_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(move |_| Ok(returned_user.clone()));

        let service = service(repository, JwtMaker::new());

        let result = service
            .login(LoginRequest::new("a@x.com", "secret123"))
            .await
            .expect("Login failed");

        assert_eq!(result.user.id, user_id);
        assert!(!result.token.is_empty());

        let claims = JwtMaker::new()
            .verify_token(&result.token, SECRET.as_bytes())
            .expect("Issued token should verify");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();
        let mut token_maker = MockTestTokenMaker::new();

        repository
            .expect_find_admin_by_email()
            .times(1)
            .returning(|_| Err(UserError::NotFound));
        token_maker.expect_create_token().times(0);

        let service = service(repository, token_maker);

        let result = service
            .login(LoginRequest::new("nobody@x.com", "secret123"))
            .await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        let mut token_maker = MockTestTokenMaker::new();

        let user = admin_with_password("secret123");
        repository
            .expect_find_admin_by_email()
            .times(1)
            .returning(move |_| Ok(user.clone()));
        token_maker.expect_create_token().times(0);

        let service = service(repository, token_maker);

        let result = service.login(LoginRequest::new("a@x.com", "wrong")).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unknown_email_costs_as_much_as_wrong_password() {
        let user = admin_with_password("secret123");

        let mut known = MockTestUserRepository::new();
        known
            .expect_find_admin_by_email()
            .returning(move |_| Ok(user.clone()));
        let mut unknown = MockTestUserRepository::new();
        unknown
            .expect_find_admin_by_email()
            .returning(|_| Err(UserError::NotFound));

        let known = service(known, JwtMaker::new());
        let unknown = service(unknown, JwtMaker::new());

        let started = std::time::Instant::now();
        let wrong_password = known.login(LoginRequest::new("a@x.com", "wrong")).await;
        let wrong_password_elapsed = started.elapsed();

        let started = std::time::Instant::now();
        let unknown_email = unknown
            .login(LoginRequest::new("nobody@x.com", "wrong"))
            .await;
        let unknown_email_elapsed = started.elapsed();

        assert_eq!(wrong_password.unwrap_err(), unknown_email.unwrap_err());
        assert!(
            unknown_email_elapsed * 4 >= wrong_password_elapsed,
            "unknown email took {unknown_email_elapsed:?}, wrong password took {wrong_password_elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_login_database_error_is_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_admin_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = service(repository, JwtMaker::new());

        let result = service
            .login(LoginRequest::new("a@x.com", "secret123"))
            .await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_signing_failure_propagates() {
        let mut repository = MockTestUserRepository::new();
        let mut token_maker = MockTestTokenMaker::new();

        let user = admin_with_password("secret123");
        repository
            .expect_find_admin_by_email()
            .times(1)
            .returning(move |_| Ok(user.clone()));
        token_maker
            .expect_create_token()
            .times(1)
            .returning(|_, _| Err(JwtError::EncodingFailed("no key".to_string())));

        let service = service(repository, token_maker);

        let result = service
            .login(LoginRequest::new("a@x.com", "secret123"))
            .await;
        assert_eq!(
            result.unwrap_err(),
            AuthError::TokenIssuanceFailed(JwtError::EncodingFailed("no key".to_string()))
        );
    }

    #[tokio::test]
    async fn test_validate_token_success() {
        let mut repository = MockTestUserRepository::new();
        let user = admin_with_password("secret123");
        let subject = user.id.to_string();

        let returned_user = user.clone();
        let expected_subject = subject.clone();
        repository
            .expect_find_admin_by_id()
            .withf(move |id| id == expected_subject)
            .times(1)
            .returning(move |_| Ok(returned_user.clone()));

        let maker = JwtMaker::new();
        let token = maker
            .create_token(
                &Claims::for_subject(&subject, Duration::hours(1)),
                SECRET.as_bytes(),
            )
            .unwrap();

        let service = service(repository, maker);

        let resolved = service.validate_token(&token).await.expect("Token rejected");
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn test_validate_malformed_token_skips_lookup() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_admin_by_id().times(0);

        let service = service(repository, JwtMaker::new());

        let result = service.validate_token("not-a-token").await;
        assert_eq!(result.unwrap_err(), AuthError::Unauthorized);
    }

    #[tokio::test]
    async fn test_validate_expired_token_skips_lookup() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_admin_by_id().times(0);

        let maker = JwtMaker::new();
        let past = (Utc::now() - Duration::minutes(5)).timestamp();
        let claims = Claims::for_subject(UserId::new(), Duration::hours(1)).with_expiration(past);
        let token = maker.create_token(&claims, SECRET.as_bytes()).unwrap();

        let service = service(repository, maker);

        let result = service.validate_token(&token).await;
        assert_eq!(result.unwrap_err(), AuthError::Unauthorized);
    }

    #[tokio::test]
    async fn test_validate_token_lookup_failures_are_unauthorized() {
        let failures = vec![
            UserError::NotFound,
            UserError::InvalidIdentifier(UserIdError::InvalidFormat("bad".to_string())),
            UserError::DatabaseError("timeout".to_string()),
        ];

        for failure in failures {
            let mut repository = MockTestUserRepository::new();
            repository
                .expect_find_admin_by_id()
                .times(1)
                .returning(move |_| Err(failure.clone()));

            let maker = JwtMaker::new();
            let token = maker
                .create_token(
                    &Claims::for_subject("66f1c0ffee", Duration::hours(1)),
                    SECRET.as_bytes(),
                )
                .unwrap();

            let service = service(repository, maker);

            let result = service.validate_token(&token).await;
            assert_eq!(result.unwrap_err(), AuthError::Unauthorized);
        }
    }
}
