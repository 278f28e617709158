//! MovieHub - Personal movie lists
//!
//! A small web application where users keep personal movie lists.
//! Titles are resolved against the OMDb metadata API and stored per user.
//!
//! ## Architecture
//!
//! - **Users**: Created by name on the home page, each owning a movie list
//! - **Lookup**: Free-text titles are matched via OMDb before storing
//! - **Storage**: SQLite, schema created on startup if absent

use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = moviehub::Config::from_env();
    if config.omdb_api_key.is_empty() {
        error!("OMDB_API_KEY is not set; movie lookups will fail");
    }

    info!(
        database = config.database_url.as_str(),
        bind_address = config.bind_address.as_str(),
        "Starting MovieHub service"
    );

    let db = moviehub::Database::new(&config.database_url).await?;
    let state = moviehub::AppState::new(db, &config);
    let app = moviehub::routes().with_state(state);

    info!("Listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
