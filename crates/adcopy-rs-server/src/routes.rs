//! Router assembly and the listener loop.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use log::info;
use std::future::Future;
use tokio::net::TcpListener;

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/diagnostics", get(handlers::diagnostics))
        .route(
            "/ads/generate",
            get(handlers::generate_from_query).post(handlers::generate_from_body),
        )
        .route("/ads/history", get(handlers::history))
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("adcopy server listening (addr={})", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("adcopy server stopped (addr={})", addr);
    Ok(())
}
