use std::{net::SocketAddr, sync::Arc};

use server::{build_router, config::load_settings, ApiContext, AppState};
use storage::HeroStore;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let store = HeroStore::new(&settings.database_url)
        .await
        .map_err(|error| {
            error!(
                database_url = %settings.database_url,
                %error,
                "failed to open hero database"
            );
            error
        })?;
    if settings.seed && store.seed_defaults().await? {
        info!("seeded default heroes");
    }

    let api = ApiContext::new(store).with_response_delay(settings.response_delay());
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, delay_ms = settings.response_delay_ms, "hero backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
