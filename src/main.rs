use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songrec_api::{
    api::{create_router, AppState},
    config::Config,
    data::FileDataProvider,
    services::RecommendationEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songrec_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let provider = FileDataProvider::from_config(&config);

    let engine = RecommendationEngine::bootstrap(&provider, config.collaborative_policy())
        .await
        .with_context(|| format!("Failed to load catalogue from {}", config.catalogue_path))?;

    let app = create_router(AppState::new(engine));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
