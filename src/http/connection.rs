use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::Config;
use crate::files::FileStore;
use crate::http::compose::{Composer, LAST_RESORT};
use crate::http::parser::parse_request;
use crate::http::request::{Command, Request};
use crate::server::shutdown::Shutdown;

/// End-of-request marker, and also the trailer every response ends with.
const TERMINATOR: &[u8] = b"\r\n\r\n";

/// One accepted connection, serviced for exactly one request/response
/// exchange and then closed, whatever the outcome.
pub struct Connection<IO, F> {
    stream: IO,
    buffer: BytesMut,
    files: Arc<F>,
    cfg: Arc<Config>,
    shutdown: Shutdown,
    state: SessionState,
}

pub enum SessionState {
    Reading,
    Dispatching(Request),
    Responding,
    Closed,
}

impl<IO, F> Connection<IO, F>
where
    IO: AsyncRead + AsyncWrite + Unpin,
    F: FileStore,
{
    pub fn new(stream: IO, files: Arc<F>, cfg: Arc<Config>, shutdown: Shutdown) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            files,
            cfg,
            shutdown,
            state: SessionState::Reading,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, SessionState::Closed) {
                SessionState::Reading => {
                    let raw = self.read_request().await?;
                    let req = parse_request(&raw, &self.cfg.index_file);
                    self.state = SessionState::Dispatching(req);
                }

                SessionState::Dispatching(req) => {
                    if let Err(e) = self.dispatch(req).await {
                        warn!("dispatch failed, writing last-resort reply: {e:#}");
                        let _ = self.stream.write_all(LAST_RESORT).await;
                    }
                    self.state = SessionState::Responding;
                }

                SessionState::Responding => {
                    // Every response stream ends with one extra terminator,
                    // regardless of which branch produced it.
                    if let Err(e) = self.stream.write_all(TERMINATOR).await {
                        debug!("trailing terminator write failed: {e}");
                    }
                    let _ = self.stream.flush().await;
                    let _ = self.stream.shutdown().await;
                    self.state = SessionState::Closed;
                }

                SessionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Accumulates bytes until the terminator sits at the tail of the
    /// buffer. If the budget elapses first, or the peer closes before ever
    /// sending the terminator, a fallback request for the generic error page
    /// is synthesized so the session still produces a response.
    async fn read_request(&mut self) -> anyhow::Result<String> {
        let deadline = Instant::now() + self.cfg.read_timeout();

        loop {
            if self.buffer.ends_with(TERMINATOR) {
                return Ok(String::from_utf8_lossy(&self.buffer).into_owned());
            }

            match tokio::time::timeout_at(deadline, self.stream.read_buf(&mut self.buffer)).await {
                Err(_elapsed) => {
                    debug!("read budget elapsed, falling back to the error page");
                    return Ok(self.fallback_request());
                }
                Ok(Ok(0)) => {
                    debug!("peer closed before the terminator arrived");
                    return Ok(self.fallback_request());
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => return Err(e.into()),
            }
        }
    }

    fn fallback_request(&self) -> String {
        format!("GET /{}\r\n\r\n", self.cfg.error_file)
    }

    async fn dispatch(&mut self, mut req: Request) -> anyhow::Result<()> {
        let files = Arc::clone(&self.files);
        let cfg = Arc::clone(&self.cfg);
        let composer = Composer::new(files.as_ref(), cfg.as_ref());

        match (req.is_valid, req.command) {
            (true, Some(Command::Quit)) => {
                self.shutdown.trigger();
                composer.send_quit(&mut self.stream).await
            }

            // 0.9: raw bytes only; a miss degrades to the 404 page, still
            // without any status line or headers.
            (true, Some(Command::Get09)) => {
                let bytes = match files.read(&req.resource) {
                    Ok(bytes) => bytes,
                    Err(_) => files
                        .read(&cfg.not_found_file)
                        .unwrap_or_else(|_| LAST_RESORT.to_vec()),
                };
                self.stream.write_all(&bytes).await?;
                Ok(())
            }

            (true, Some(Command::Get10)) => composer.send_get(&mut self.stream, &mut req).await,

            (true, Some(Command::Head10)) => composer.send_head(&mut self.stream, &mut req).await,

            // Malformed request: a 1.x client gets the bad-request page with
            // a proper head, a 0.9 client gets the generic error page bare.
            _ => {
                if req.uses_modern_http {
                    composer.send_bad_request(&mut self.stream).await
                } else {
                    let bytes = files
                        .read(&cfg.error_file)
                        .unwrap_or_else(|_| LAST_RESORT.to_vec());
                    self.stream.write_all(&bytes).await?;
                    Ok(())
                }
            }
        }
    }
}
