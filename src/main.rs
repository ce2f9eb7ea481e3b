use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recs::{
    api::{create_router, AppState},
    config::Config,
    MovieContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recs=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let context = MovieContext::load(&config.catalog_path)
        .with_context(|| format!("Failed to build movie index from {}", config.catalog_path))?;

    let state = AppState::new(context, &config);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
