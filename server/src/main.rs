//! Summit API server.
//!
//! Run from repo root: `cargo run -p summit-server`

use summit_api::{app, AppState, Catalog, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("summit_api=info,summit_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let catalog = Catalog::load()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(&settings.database_url)
        .await?;

    let addr = settings.bind_addr();
    let prefix = settings.api_prefix.clone();
    let resources = catalog.resources.len();
    let router = app(AppState::new(pool, catalog, settings));
    let listener = TcpListener::bind(&addr).await?;
    let port = listener.local_addr()?.port();
    tracing::info!(resources, prefix = %prefix, "summit api listening on port {}", port);
    axum::serve(listener, router).await?;
    Ok(())
}
