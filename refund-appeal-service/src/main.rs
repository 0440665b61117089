use refund_appeal::{AnalysisClient, AnalysisConfig};
use refund_appeal_service::{DEFAULT_MAX_UPLOAD_BYTES, create_app, init_tracing};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Missing credential is fatal at startup
    let config = AnalysisConfig::from_env();
    if let Err(e) = config.require_api_key() {
        error!("{}", e);
        std::process::exit(1);
    }
    info!(?config, "Loaded analysis configuration");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

    let app = create_app(AnalysisClient::from_config(&config), max_upload_bytes);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("Refund Appeal Service starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Analysis endpoint: POST http://{}/refund/analyze", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
