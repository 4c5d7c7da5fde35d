use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::Config;
use crate::files::FileStore;
use crate::http::connection::Connection;
use crate::server::shutdown::Shutdown;

/// Binds the listening socket and accepts connections until shutdown is
/// triggered. Each connection is serviced in its own task; only a failure to
/// bind is fatal, accept errors are logged and the loop continues.
///
/// Once the shutdown flag is observed, no further connections are accepted
/// but every session already dispatched runs to completion before this
/// returns - including the one that carried the QUIT and is still writing
/// its notice.
pub async fn run<F>(cfg: Arc<Config>, files: Arc<F>, shutdown: Shutdown) -> anyhow::Result<()>
where
    F: FileStore + 'static,
{
    cfg.validate()?;
    let listener = TcpListener::bind(cfg.listen_addr()).await?;
    info!("Listening on {}", cfg.listen_addr());

    let mut sessions = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                break;
            }

            Some(_) = sessions.join_next(), if !sessions.is_empty() => {}

            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Accept failed: {e}");
                        continue;
                    }
                };
                info!("Accepted connection from {peer}");

                let conn = Connection::new(
                    socket,
                    Arc::clone(&files),
                    Arc::clone(&cfg),
                    shutdown.clone(),
                );
                sessions.spawn(async move {
                    if let Err(e) = conn.run().await {
                        error!("Connection error from {peer}: {e:#}");
                    }
                });
            }
        }
    }

    info!("Shutdown flag set, draining {} open session(s)", sessions.len());
    while sessions.join_next().await.is_some() {}
    info!("All sessions finished, closing listener");

    Ok(())
}
