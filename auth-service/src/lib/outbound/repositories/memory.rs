use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local [`UserRepository`] with the same uniqueness and validity
/// rules as the PostgreSQL adapter. Used by tests and local runs.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, skipping the build step and the email index.
    ///
    /// Lets tests plant records that storage could hold but `create` would
    /// never produce.
    pub async fn insert_raw(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn usable_admin(user: Option<&User>) -> Result<User, UserError> {
        let user = user.filter(|u| u.is_admin()).ok_or(UserError::NotFound)?;

        user.check().map_err(|e| {
            tracing::warn!(error = %e, user_id = %user.id, "Stored admin record failed structural check");
            UserError::NotFound
        })?;

        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        user.build()?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateKey(user.email.as_str().to_string()));
        }

        let user = user.into_user(UserId::new(), Utc::now());
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<User, UserError> {
        let users = self.users.read().await;

        Self::usable_admin(
            users
                .values()
                .find(|u| u.email.as_str() == email && u.is_admin()),
        )
    }

    async fn find_admin_by_id(&self, id: &str) -> Result<User, UserError> {
        let id = UserId::from_string(id)?;
        let users = self.users.read().await;

        Self::usable_admin(users.get(&id))
    }
}
