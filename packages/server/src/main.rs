use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{Level, info};

use server::config::AppConfig;
use server::state::AppState;
use server::storage::FilesystemMediaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    info!(environment = %config.environment, "Starting Lakeside API");

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::seed_badges(&db).await?;
    server::seed::ensure_indexes(&db).await?;
    info!("Database initialized");

    let media = FilesystemMediaStore::open_dir(
        config.storage.media_dir.clone(),
        config.storage.max_upload_size,
    )
    .await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        config,
        media: Arc::new(media),
        http: reqwest::Client::new(),
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
