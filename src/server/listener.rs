use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::state::AppState;
use crate::session::spawn_sweeper;

/// Pause after a failed accept so a persistent error (e.g. fd exhaustion)
/// does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Bootstraps state from `cfg`, binds, and serves until the task is dropped.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let app = Arc::new(AppState::from_config(cfg)?);

    let listener = TcpListener::bind(cfg.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr()))?;
    info!("Listening on {}", listener.local_addr()?);
    info!("Serving files from {}", app.router.files().root().display());

    let _sweeper = app
        .sessions
        .as_ref()
        .map(|store| spawn_sweeper(Arc::clone(store), cfg.sweep_interval()));

    serve(listener, app).await
}

/// Accept loop: one task per connection.
///
/// Accept errors are logged and skipped; a failing connection never takes
/// the listener down.
pub async fn serve(listener: TcpListener, app: Arc<AppState>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Error accepting connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let app = Arc::clone(&app);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, Some(peer), app);
            match conn.run().await {
                Ok(()) => debug!("Connection from {} closed", peer),
                Err(e) => debug!("Connection from {} ended: {}", peer, e),
            }
        });
    }
}
