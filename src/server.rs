use axum::{Router, routing::get};
use tokio::net::TcpListener;

use crate::{api, error::Result, info, state::AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/sign_out", get(api::sign_out))
        .route("/playlists", get(api::playlists))
        .route("/create_playlist", get(api::create_playlist))
        .route("/health", get(api::health))
        .with_state(state)
}

pub async fn start_api_server(state: AppState) -> Result<()> {
    let addr = state.config.server_addr;
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
