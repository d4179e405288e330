#![allow(dead_code)]

use std::sync::Arc;

use auth::JwtMaker;
use auth::PasswordHasher;
use auth_service::app::spawn_server;
use auth_service::domain::auth::service::AuthService;
use auth_service::domain::user::models::User;
use auth_service::inbound::http::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use auth_service::shutdown;
use auth_service::shutdown::ShutdownListener;
use auth_service::user::provision::create_admin;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory repository
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub token_maker: JwtMaker,
    pub api_client: reqwest::Client,
    cancel: CancellationToken,
    shutdown: Option<ShutdownListener>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_ttl(chrono::Duration::hours(24)).await
    }

    pub async fn spawn_with_ttl(token_ttl: chrono::Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::new(JwtMaker::new()),
            TEST_SECRET,
            token_ttl,
        ));

        let router = create_router(auth_service);

        let (trigger, shutdown) = shutdown::channel();
        let cancel = CancellationToken::new();
        spawn_server(listener, router, trigger, cancel.clone());

        Self {
            address,
            repository,
            token_maker: JwtMaker::new(),
            api_client: reqwest::Client::new(),
            cancel,
            shutdown: Some(shutdown),
        }
    }

    /// Seed an admin through the provisioning path
    pub async fn seed_admin(&self, email: &str, password: &str) -> User {
        create_admin(
            self.repository.as_ref(),
            &PasswordHasher::new(),
            email,
            password,
        )
        .await
        .expect("Failed to seed admin")
    }

    /// Log in and return the issued token
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let body: serde_json::Value = self
            .post("/api/v1/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }

    /// Take the listener that observes unexpected server exits
    pub fn take_shutdown_listener(&mut self) -> ShutdownListener {
        self.shutdown.take().expect("Shutdown listener already taken")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
}

impl TestDb {
    /// Create a new test database with a unique name
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub async fn new() -> Option<Self> {
        let postgres_url = std::env::var("DATABASE_URL").ok()?;

        let db_name = format!(
            "test_auth_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self { pool, db_name })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let db_name = self.db_name.clone();
        let Ok(postgres_url) = std::env::var("DATABASE_URL") else {
            return;
        };

        // Database cleanup happens asynchronously
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                // Terminate existing connections
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
