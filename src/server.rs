use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{api, auth::AuthService, config, error};

pub async fn start_api_server(auth: Arc<AuthService>) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/auth/status", get(api::status))
        .route("/auth/login", post(api::login))
        .route("/auth/verify", post(api::verify))
        .route("/auth/cancel", post(api::cancel))
        .layer(Extension(auth));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
