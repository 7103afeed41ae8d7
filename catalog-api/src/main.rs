use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_api::config::LogFormat;
use catalog_api::{router, ApiError, Dependencies, Settings};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    let dependencies = Dependencies::new(&settings).await.map_err(|e| {
        error!(error = %e, "Failed to initialize dependencies");
        e
    })?;

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "Catalog API listening");

    axum::serve(listener, router(dependencies.state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Catalog API stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
