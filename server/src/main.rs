//! biztime server: reads settings from the environment, prepares the database, and serves the API.
//!
//! `cargo run -p biztime-server` against `DATABASE_URL`, or `cargo run -p biztime-server -- --memory`
//! to serve the sample data from an in-process store.

use biztime::{
    app, ensure_database_exists, ensure_tables, seed_sample_data, AppState, MemoryStore, PgStore, ServerConfig,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("biztime=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let in_memory = std::env::args().skip(1).any(|a| a == "--memory");

    let state = if in_memory {
        tracing::info!("using in-memory store with sample data");
        AppState::new(MemoryStore::seeded()?)
    } else {
        ensure_database_exists(&config.database_url).await?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        ensure_tables(&pool).await?;
        if config.seed {
            seed_sample_data(&pool).await?;
        }
        AppState::new(PgStore::new(pool))
    };

    let router = app(state, config.body_limit);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
