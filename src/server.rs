use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, types::PkceToken};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> crate::Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
