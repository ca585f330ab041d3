use std::sync::Arc;

use crate::{auth::AuthService, config, info, server::start_api_server};

/// Runs the local authentication API server until interrupted.
pub async fn serve(service: Arc<AuthService>) {
    info!("Starting authentication server on {}", config::server_addr());
    start_api_server(service).await;
}
