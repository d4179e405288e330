use auth_service::app::App;
use auth_service::config::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        host = %config.server.host,
        http_port = config.server.port,
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let mut app = App::new(config);
    app.run().await;

    match app.shutdown().await {
        Ok(()) => {
            tracing::info!("Service stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Service stopped with error");
            Err(e.into())
        }
    }
}
