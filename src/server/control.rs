use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::server::shutdown::Shutdown;

/// Sentinel value an operator enters on the console to stop the server.
const EXIT_SENTINEL: &str = "0";

/// Watches stdin for the exit sentinel and triggers shutdown when it
/// arrives. Runs until then, or until stdin closes.
pub async fn watch_stdin(shutdown: Shutdown) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim() == EXIT_SENTINEL {
            info!("Exit requested from console");
            shutdown.trigger();
            break;
        }
    }
}
