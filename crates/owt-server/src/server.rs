//! Router assembly and the serve loop

use std::net::SocketAddr;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use owt_auth::OriginGate;
use owt_auth::tower::OriginGateLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::error::ServerResult;
use crate::extract::ConnectInfoExtractor;
use crate::routes::{
    GENERATE_TOKEN_PATH, HEALTH_PATH, PAYLOAD_PATH, VALIDATE_TOKEN_PATH, generate_token, health,
    payload_from_token, validate_token,
};
use crate::state::{AppState, origin_gate};

/// Mount point of the token API
pub const API_PREFIX: &str = "/api/v1/owt";

/// Claim requests are small; anything larger is refused before parsing
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the application router
///
/// Every token route sits behind the origin gate. `/health` does not.
pub fn build_router(state: AppState, gate: OriginGate, extractor: ConnectInfoExtractor) -> Router {
    let api = Router::new()
        .route(GENERATE_TOKEN_PATH, post(generate_token))
        .route(VALIDATE_TOKEN_PATH, post(validate_token))
        .route(PAYLOAD_PATH, post(payload_from_token))
        .route_layer(OriginGateLayer::with_extractor(gate, extractor));

    Router::new()
        .nest(API_PREFIX, api)
        .route(HEALTH_PATH, get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the service until Ctrl-C
///
/// # Errors
///
/// Returns an error if the key cannot be loaded, the address cannot be bound,
/// or the server fails while running.
pub async fn serve(config: &ServiceConfig) -> ServerResult<()> {
    let addr = config.bind_addr()?;
    let state = AppState::from_config(config)?;
    let gate = origin_gate(config);
    let router = build_router(
        state,
        gate,
        ConnectInfoExtractor::new(config.origin.trust_forwarded_for),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        app_id = %config.origin.app_id,
        issuers = %config.token.issuers,
        audiences = %config.token.audiences,
        "OWT service listening"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("OWT service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a handler, run until killed
        error!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
