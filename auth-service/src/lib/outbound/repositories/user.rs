use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use tokio::time::timeout;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Upper bound for every statement issued by the repository.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

const EMAIL_INDEX: &str = "users_email_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create the repository, ensuring the unique email index exists.
    ///
    /// Safe to call on every start; the index is only created when missing.
    ///
    /// # Errors
    /// * `DatabaseError` - Index creation failed or timed out
    pub async fn new(pool: PgPool) -> Result<Self, UserError> {
        let repository = Self { pool };
        repository.ensure_email_index().await?;
        Ok(repository)
    }

    async fn ensure_email_index(&self) -> Result<(), UserError> {
        let statement =
            format!("CREATE UNIQUE INDEX IF NOT EXISTS {EMAIL_INDEX} ON users (email ASC)");

        timeout(QUERY_TIMEOUT, sqlx::query(&statement).execute(&self.pool))
            .await
            .map_err(|_| timed_out("create email index"))?
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        tracing::info!(index = EMAIL_INDEX, table = "users", "Unique email index ensured");
        Ok(())
    }

    async fn find_admin_where(&self, sql: &str, key: String) -> Result<User, UserError> {
        let query = sqlx::query_as::<_, UserRecord>(sql)
            .bind(key)
            .bind(Role::Admin.as_str());

        let record = timeout(QUERY_TIMEOUT, query.fetch_optional(&self.pool))
            .await
            .map_err(|_| timed_out("find admin"))?
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .ok_or(UserError::NotFound)?;

        User::try_from(record).map_err(|e| {
            tracing::warn!(error = %e, "Stored admin record failed structural check");
            UserError::NotFound
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        user.build()?;

        let query = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str());

        let (id, created_at) = timeout(QUERY_TIMEOUT, query.fetch_one(&self.pool))
            .await
            .map_err(|_| timed_out("insert user"))?
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return UserError::DuplicateKey(user.email.as_str().to_string());
                    }
                }
                UserError::DatabaseError(e.to_string())
            })?;

        Ok(user.into_user(UserId(id), created_at))
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<User, UserError> {
        self.find_admin_where(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM users
            WHERE email = $1 AND role = $2
            "#,
            email.to_string(),
        )
        .await
    }

    async fn find_admin_by_id(&self, id: &str) -> Result<User, UserError> {
        let id = UserId::from_string(id)?;

        self.find_admin_where(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM users
            WHERE id = $1::uuid AND role = $2
            "#,
            id.to_string(),
        )
        .await
    }
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = UserError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let user = User {
            id: UserId(record.id),
            email: EmailAddress::new(record.email)?,
            password_hash: record.password_hash,
            role: record.role.parse()?,
            created_at: record.created_at,
        };
        user.check()?;
        Ok(user)
    }
}

fn timed_out(operation: &str) -> UserError {
    UserError::DatabaseError(format!("{operation} timed out after {QUERY_TIMEOUT:?}"))
}
