use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::http::HeaderValue;
use sea_orm::Database;
use tracing::info;

use biovault_core::tracing::init_tracing;
use biovault_identity::config::IdentityConfig;
use biovault_identity::infra::face::HttpFaceClient;
use biovault_identity::infra::voice::AzureVoiceClient;
use biovault_identity::router::build_router;
use biovault_identity::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = IdentityConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.external_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let cors_allowed_origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .context("invalid CORS_ALLOWED_ORIGIN")?;

    let state = AppState {
        db: Arc::new(db),
        face: HttpFaceClient::new(http.clone(), &config.face_service_url),
        voice: AzureVoiceClient::new(http, config.voice_endpoint()?, &config.azure_speech_key),
        otp_ttl_secs: config.otp_ttl_secs,
        cors_allowed_origin,
        max_upload_bytes: config.max_upload_bytes,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("identity service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
