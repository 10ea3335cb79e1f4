use std::env;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fundus_export::styles::ReportFont;
use fundus_storage::memory::MemoryStore;
use fundus_storage::s3::S3Store;
use fundus_storage::store::RecordStore;
use fundus_web::app;
use fundus_web::config::{StoreKind, WebConfig};
use fundus_web::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = WebConfig::from_env()?;

    let font = ReportFont::load(&config.font_path)?;

    match config.store {
        StoreKind::S3 => {
            let client = fundus_storage::client::build_client().await;
            info!(bucket = %config.bucket, "using S3 record store");
            serve(S3Store::new(client, config.bucket.clone()), &config, font).await
        }
        StoreKind::Memory => {
            let store = match &config.seed_file {
                Some(path) => MemoryStore::load_seed_file(path)?,
                None => MemoryStore::new(),
            };
            info!("using in-memory record store");
            serve(store, &config, font).await
        }
    }
}

async fn serve<S: RecordStore>(store: S, config: &WebConfig, font: ReportFont) -> eyre::Result<()> {
    let state = AppState::new(store, config, font)?;
    let app = app::router(state);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
    } else {
        let listener = TcpListener::bind(config.bind_addr).await?;
        info!(addr = %config.bind_addr, "listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
