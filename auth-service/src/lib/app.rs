//! Service lifecycle: storage connection, wiring, serving and shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::JwtMaker;
use axum::Router;
use config::ConfigError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::domain::auth::service::AuthService;
use crate::inbound::http::create_router;
use crate::outbound::repositories::PostgresUserRepository;
use crate::shutdown;
use crate::shutdown::ShutdownListener;
use crate::shutdown::ShutdownTrigger;
use crate::user::errors::UserError;

const MAX_CONNECTIONS: u32 = 5;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to initialise user repository: {0}")]
    Repository(#[from] UserError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Http server failed: {0}")]
    Server(#[source] std::io::Error),

    #[error("Http server stopped unexpectedly")]
    ServerStopped,

    #[error("Failed to listen for termination signals: {0}")]
    Signal(#[source] std::io::Error),
}

/// Owns the storage pool, the serving task and the shutdown listener.
///
/// `run` never returns an error directly; every fatal condition is posted to
/// the shutdown channel and surfaces from `shutdown`.
pub struct App {
    config: Config,
    pool: Option<PgPool>,
    trigger: ShutdownTrigger,
    listener: ShutdownListener,
    cancel: CancellationToken,
    server: Option<JoinHandle<()>>,
    signals: JoinHandle<()>,
    local_addr: Option<SocketAddr>,
}

impl App {
    /// Create the application and start listening for termination signals.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: Config) -> Self {
        let (trigger, listener) = shutdown::channel();
        let signals = shutdown::listen_for_termination(trigger.clone());

        Self {
            config,
            pool: None,
            trigger,
            listener,
            cancel: CancellationToken::new(),
            server: None,
            signals,
            local_addr: None,
        }
    }

    /// Connect to storage, wire the service and start the HTTP server.
    pub async fn run(&mut self) {
        if let Err(e) = self.start().await {
            tracing::error!(error = %e, "Startup failed");
            self.trigger.fire(Err(e));
        }
    }

    /// Address the HTTP server is bound to, once running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Wait for the first shutdown outcome, stop serving and release storage.
    ///
    /// # Returns
    /// `Ok(())` after a requested shutdown, otherwise the error that ended the service
    pub async fn shutdown(self) -> Result<(), AppError> {
        let outcome = self.listener.wait().await;

        self.cancel.cancel();
        self.signals.abort();

        if let Some(server) = self.server {
            match timeout(DRAIN_TIMEOUT, server).await {
                Ok(Ok(())) => tracing::info!("Http server drained"),
                Ok(Err(e)) => tracing::warn!(error = %e, "Http server task failed"),
                Err(_) => tracing::warn!(timeout = ?DRAIN_TIMEOUT, "Http server did not drain in time"),
            }
        }

        if let Some(pool) = self.pool {
            match timeout(DISCONNECT_TIMEOUT, pool.close()).await {
                Ok(()) => tracing::info!(database = "postgresql", "Database connection pool closed"),
                Err(_) => tracing::warn!(database = "postgresql", "Failed to disconnect from database"),
            }
        }

        outcome
    }

    async fn start(&mut self) -> Result<(), AppError> {
        self.config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect(&self.config.database.url)
            .await?;
        self.pool = Some(pool.clone());
        tracing::info!(
            max_connections = MAX_CONNECTIONS,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        let user_repository = Arc::new(PostgresUserRepository::new(pool).await?);
        let auth_service = Arc::new(AuthService::new(
            user_repository,
            Arc::new(JwtMaker::new()),
            self.config.jwt.secret.as_bytes(),
            chrono::Duration::hours(self.config.jwt.expiration_hours),
        ));

        let address = self.config.server.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| AppError::Bind {
                address: address.clone(),
                source,
            })?;
        self.local_addr = listener.local_addr().ok();
        tracing::info!(address = %address, protocol = "http", "Auth service listening");

        self.server = Some(spawn_server(
            listener,
            create_router(auth_service),
            self.trigger.clone(),
            self.cancel.clone(),
        ));

        Ok(())
    }
}

/// Serve `router` until `cancel` fires.
///
/// If the server stops for any other reason its error is posted to `trigger`.
pub fn spawn_server(
    listener: TcpListener,
    router: Router,
    trigger: ShutdownTrigger,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(cancel.clone().cancelled_owned())
            .await;

        if cancel.is_cancelled() {
            tracing::info!("Http server stopped");
            return;
        }

        let error = match result {
            Ok(()) => AppError::ServerStopped,
            Err(e) => AppError::Server(e),
        };
        tracing::error!(error = %error, "Http server exited");
        trigger.fire(Err(error));
    })
}
