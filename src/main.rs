use std::sync::Arc;

use pyttewebb::config::Config;
use pyttewebb::files::LocalFiles;
use pyttewebb::server;
use pyttewebb::server::shutdown::Shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let mut cfg = Config::load()?;

    // An explicit port on the command line overrides the configured one.
    if let Some(arg) = std::env::args().nth(1) {
        cfg.override_port(&arg);
    }
    cfg.validate()?;

    let cfg = Arc::new(cfg);
    let files = Arc::new(LocalFiles::new(cfg.document_root.clone()));
    let shutdown = Shutdown::new();

    tokio::spawn(server::control::watch_stdin(shutdown.clone()));

    tokio::select! {
        res = server::listener::run(cfg, files, shutdown.clone()) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    }

    Ok(())
}
