use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    repository::{InMemoryRepository, MockConfig},
    router::{create_router, AppState},
};

fn state_for(config: MockConfig) -> AppState {
    let repo = Arc::new(InMemoryRepository::new(config.baseline));
    AppState::new(repo, config.admin_token)
}

/// Run the mock API until the process is stopped. Tracing is set up by the caller.
pub async fn run_server(config: MockConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state_for(config));

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting mock API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Bind to an ephemeral localhost port and serve in the background.
pub async fn spawn_ephemeral(config: MockConfig) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let app = create_router(state_for(config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let task = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(error = %err, "mock API stopped");
        }
    });

    Ok((addr, task))
}
