//! Binary entrypoint for the incident API.

use std::sync::Arc;

use incident_api::{AppState, Config};
use incident_store::IncidentStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "incident_api=info,incident_store=info,tower_http=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  let addr = config.bind_addr()?;

  let store = IncidentStore::open(config.store_config())?;
  tokio::fs::create_dir_all(&config.upload_dir).await?;
  tracing::info!(upload_dir = %config.upload_dir.display(), "upload directory ready");

  let state = Arc::new(AppState {
    store,
    upload_dir: config.upload_dir.clone(),
  });
  let app = incident_api::router(state, config.max_upload_bytes);

  tracing::info!("incident-api listening on http://{}", addr);
  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
