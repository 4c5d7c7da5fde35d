use tokio::io::{AsyncWrite, AsyncWriteExt};

/// HTTP status codes the server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use pyttewebb::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A response ready to be written to the client.
///
/// Headers are kept as ordered raw lines because the protocol fixes their
/// order (Date, Server, Content-Length, Connection, Content-Type). The body
/// stays `None` for HEAD responses; HTTP/0.9 and QUIT replies bypass this
/// type entirely and write raw bytes.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<String>,
    pub body: Option<Vec<u8>>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn push_header(&mut self, header: impl Into<String>) {
        self.headers.push(header.into());
    }

    /// Serializes the status line and headers, ending with the blank-line
    /// terminator. The status line always advertises HTTP/1.1, also for
    /// requests made with HTTP/1.0.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        let status_line = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        buf.extend_from_slice(status_line.as_bytes());

        for header in &self.headers {
            buf.extend_from_slice(header.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Writes the head block followed by the body, when one is present.
    pub async fn write_to<W>(&self, out: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        out.write_all(&self.head_bytes()).await?;
        if let Some(body) = &self.body {
            out.write_all(body).await?;
        }
        Ok(())
    }
}
