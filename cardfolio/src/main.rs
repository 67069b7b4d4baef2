//! cardfolio server binary

use std::net::SocketAddr;

use cardfolio::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cardfolio::observability::init()?;

    let config = AppConfig::load()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "cardfolio listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
