mod auth;
mod config;
mod db;
mod error;
mod pages;
mod posts;
mod registration;
mod routes;
mod state;
mod uploads;
mod ws;

use std::path::PathBuf;
use tokio::net::TcpListener;

use config::{generate_config_template, Config, DEFAULT_JWT_SECRET};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load()?;

    // Handle --generate-config: print template and exit
    if config.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Initialize tracing/logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "parlor_server=info".parse().unwrap()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "parlor_server=info".parse().unwrap()),
            )
            .init();
    }

    tracing::info!("parlor server v{} starting", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite database
    let db = db::init_db(&config.data_dir)?;

    if config.jwt_secret == DEFAULT_JWT_SECRET {
        tracing::warn!(
            "JWT_SECRET is the built-in placeholder; session tokens are forgeable. \
             Set JWT_SECRET before exposing this server."
        );
    }

    // Ensure the uploads directory exists before the first multipart request
    std::fs::create_dir_all(&config.uploads_dir)?;

    // Build application state
    let app_state = state::AppState {
        db,
        jwt_secret: config.jwt_secret.clone().into_bytes(),
        clients: ws::new_client_registry(),
        uploads_dir: PathBuf::from(&config.uploads_dir),
        public_dir: PathBuf::from(&config.public_dir),
    };

    // Build router
    let app = routes::build_router(app_state);

    // Bind and serve
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
