//! Builds responses for the HTTP/1.x commands.

use anyhow::Result;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::Config;
use crate::files::FileStore;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Written when even the designated error page cannot be read.
pub const LAST_RESORT: &[u8] =
    b"server error: the expected pages are missing from the document root";

/// Plaintext notice sent in reply to QUIT.
pub const SHUTDOWN_NOTICE: &[u8] = b"Server shutting down";

/// Builds and sends responses for one request, consulting the file store
/// for existence, size and MIME type of the selected resource.
pub struct Composer<'a, F> {
    files: &'a F,
    cfg: &'a Config,
}

impl<'a, F: FileStore> Composer<'a, F> {
    pub fn new(files: &'a F, cfg: &'a Config) -> Self {
        Self { files, cfg }
    }

    /// Builds the status line and metadata headers for a 1.x request.
    ///
    /// When the resource is missing or unreadable the status becomes 404 and
    /// `req.resource` is rewritten to the configured not-found page, so the
    /// Content-Length and Content-Type below describe the page actually sent.
    pub fn compose_head(&self, req: &mut Request) -> Result<Response> {
        let status = if self.files.exists_and_readable(&req.resource) {
            StatusCode::Ok
        } else {
            req.resource = self.cfg.not_found_file.clone();
            StatusCode::NotFound
        };

        let date = OffsetDateTime::now_utc().format(&Rfc2822)?;
        let size = self.files.size(&req.resource)?;

        let mut resp = Response::new(status);
        resp.push_header(format!("Date: {date}"));
        resp.push_header(format!("Server: {}", self.cfg.server_token));
        resp.push_header(format!("Content-Length: {size}"));
        resp.push_header("Connection: close");
        resp.push_header(format!("Content-Type: {}", self.files.mime_type(&req.resource)));
        Ok(resp)
    }

    /// Builds the full response for a 1.x GET: the head plus the body of
    /// the selected page.
    ///
    /// compose_head already redirected a miss to the not-found page; if that
    /// page cannot be read either, the body degrades to the literal message.
    pub fn compose_get(&self, req: &mut Request) -> Result<Response> {
        let mut resp = self.compose_head(req)?;
        resp.body = match self.files.read(&req.resource) {
            Ok(body) => Some(body),
            Err(_) => Some(LAST_RESORT.to_vec()),
        };
        Ok(resp)
    }

    /// Sends head and body for a 1.x GET.
    pub async fn send_get<W>(&self, out: &mut W, req: &mut Request) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let resp = self.compose_get(req)?;
        resp.write_to(out).await?;
        Ok(())
    }

    /// Sends the head only, for a 1.x HEAD.
    pub async fn send_head<W>(&self, out: &mut W, req: &mut Request) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let resp = self.compose_head(req)?;
        resp.write_to(out).await?;
        Ok(())
    }

    /// Replies to a malformed 1.x request by dispatching a fresh GET for the
    /// configured bad-request page, with the status rewritten to 400.
    pub async fn send_bad_request<W>(&self, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let raw = format!("GET /{} HTTP/1.1\r\n\r\n", self.cfg.bad_request_file);
        let mut req = parse_request(&raw, &self.cfg.index_file);

        let mut resp = self.compose_get(&mut req)?;
        if resp.status == StatusCode::Ok {
            resp.status = StatusCode::BadRequest;
        }
        resp.write_to(out).await?;
        Ok(())
    }

    /// Sends the plaintext shutdown notice; no status line, no headers.
    pub async fn send_quit<W>(&self, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        out.write_all(SHUTDOWN_NOTICE).await?;
        Ok(())
    }
}
