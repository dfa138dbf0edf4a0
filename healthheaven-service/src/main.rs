use healthheaven_service::config::HealthHeavenConfig;
use healthheaven_service::services::init_metrics;
use healthheaven_service::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HealthHeavenConfig::load()?;

    init_tracing(
        "healthheaven-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start healthheaven-service: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;
    application.run_until_stopped().await?;

    Ok(())
}
