//! Accept-loop tests over real sockets.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use pyttewebb::config::Config;
use pyttewebb::files::{FileStore, guess_mime_type};
use pyttewebb::server::listener;
use pyttewebb::server::shutdown::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// In-memory document root whose reads take a while, so a session can be
/// caught mid-dispatch.
struct SlowFiles {
    files: HashMap<String, Vec<u8>>,
    read_delay: Duration,
}

impl SlowFiles {
    fn new(entries: &[(&str, &str)], read_delay: Duration) -> Self {
        let files = entries
            .iter()
            .map(|(name, body)| (name.to_string(), body.as_bytes().to_vec()))
            .collect();
        Self { files, read_delay }
    }
}

impl FileStore for SlowFiles {
    fn exists_and_readable(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn size(&self, path: &str) -> io::Result<u64> {
        self.files
            .get(path)
            .map(|b| b.len() as u64)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn mime_type(&self, path: &str) -> String {
        guess_mime_type(path).to_string()
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::thread::sleep(self.read_delay);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn connect_with_retry(addr: &str) -> TcpStream {
    for _ in 0..50 {
        if let Ok(stream) = TcpStream::connect(addr).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not start listening on {addr}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_quit_drains_in_flight_sessions_before_listener_returns() {
    let mut cfg = Config::default();
    cfg.port = free_port();
    let addr = cfg.listen_addr();

    let files = SlowFiles::new(
        &[("index.html", "<html>index</html>")],
        Duration::from_millis(300),
    );
    let shutdown = Shutdown::new();
    let server = tokio::spawn(listener::run(
        Arc::new(cfg),
        Arc::new(files),
        shutdown.clone(),
    ));

    // one session stuck in its slow body read...
    let mut slow = connect_with_retry(&addr).await;
    slow.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // ...while another connection shuts the server down
    let mut quit = TcpStream::connect(&addr).await.unwrap();
    quit.write_all(b"QUIT\r\n\r\n").await.unwrap();

    let mut notice = Vec::new();
    quit.read_to_end(&mut notice).await.unwrap();
    assert_eq!(notice, b"Server shutting down\r\n\r\n");

    // the in-flight GET still runs to completion
    let mut out = Vec::new();
    slow.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8_lossy(&out);
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "got: {text}");
    assert!(text.contains("<html>index</html>"));
    assert!(text.ends_with("\r\n\r\n"));

    // and the accept loop only returns once every session is done
    server.await.unwrap().unwrap();
    assert!(shutdown.is_triggered());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_listener_stops_accepting_after_external_trigger() {
    let mut cfg = Config::default();
    cfg.port = free_port();
    // keep the drain short for the probe session below
    cfg.read_timeout_millis = 100;
    let addr = cfg.listen_addr();

    let files = SlowFiles::new(&[("index.html", "x")], Duration::ZERO);
    let shutdown = Shutdown::new();
    let server = tokio::spawn(listener::run(
        Arc::new(cfg),
        Arc::new(files),
        shutdown.clone(),
    ));

    // make sure the listener is up, then trigger shutdown out of band
    let _probe = connect_with_retry(&addr).await;
    shutdown.trigger();
    server.await.unwrap().unwrap();

    assert!(TcpStream::connect(&addr).await.is_err());
}
