//! File access for the document root.
//!
//! The protocol layer never touches the filesystem directly; it goes through
//! the [`FileStore`] trait so sessions can be exercised against an in-memory
//! store in tests.

use std::io;
use std::path::PathBuf;

/// Read access to the resources the server may serve.
///
/// Paths are relative to the store's root; the request grammar has already
/// rejected anything with `..` or absolute components by the time a path
/// reaches this layer.
pub trait FileStore: Send + Sync {
    /// Whether the resource exists and can be opened for reading.
    fn exists_and_readable(&self, path: &str) -> bool;

    /// Size of the resource in bytes.
    fn size(&self, path: &str) -> io::Result<u64>;

    /// Best-effort MIME type guess for the resource.
    fn mime_type(&self, path: &str) -> String;

    /// The full contents of the resource.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// [`FileStore`] backed by a directory on the local filesystem.
pub struct LocalFiles {
    root: PathBuf,
}

impl LocalFiles {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl FileStore for LocalFiles {
    fn exists_and_readable(&self, path: &str) -> bool {
        std::fs::File::open(self.resolve(path))
            .and_then(|f| f.metadata())
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    fn size(&self, path: &str) -> io::Result<u64> {
        std::fs::metadata(self.resolve(path)).map(|m| m.len())
    }

    fn mime_type(&self, path: &str) -> String {
        guess_mime_type(path).to_string()
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }
}

/// Guesses a MIME type from the file extension.
pub fn guess_mime_type(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

    match extension {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "txt" => "text/plain",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_types() {
        assert_eq!(guess_mime_type("index.html"), "text/html");
        assert_eq!(guess_mime_type("style.css"), "text/css");
        assert_eq!(guess_mime_type("logo.png"), "image/png");
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(guess_mime_type("data.bin"), "application/octet-stream");
        assert_eq!(guess_mime_type("noextension"), "application/octet-stream");
    }
}
