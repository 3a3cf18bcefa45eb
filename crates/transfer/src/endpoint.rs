use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tokio::net::TcpListener;

use crate::{
    error::TransferError,
    receive::{self, ReceiveContext},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn make_server_listener(bind_addr: SocketAddr) -> Result<TcpListener, TransferError> {
    TcpListener::bind(bind_addr)
        .await
        .map_err(|source| TransferError::Bind {
            addr: bind_addr,
            source,
        })
}

/// A single `POST /` route. Bodies are unbounded: the handler reads them
/// only after the operator accepted.
pub(crate) fn make_server_router(ctx: Arc<ReceiveContext>) -> Router {
    Router::new()
        .route("/", post(receive::handle_push))
        .layer(DefaultBodyLimit::disable())
        .with_state(ctx)
}

/// HTTP client for pushing files. No overall request timeout: the receiving
/// operator may take as long as they like to answer.
pub fn make_client() -> Result<reqwest::Client, TransferError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}
