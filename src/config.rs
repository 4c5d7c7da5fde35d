use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Server configuration.
///
/// Loaded from a YAML file named by the `PYTTEWEBB_CONFIG` environment
/// variable, falling back to built-in defaults when the variable is unset.
/// Every field is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listening socket binds to.
    pub host: String,
    /// Port the listening socket binds to (1-65535).
    pub port: u16,
    /// Directory all resource paths resolve against.
    pub document_root: PathBuf,
    /// Page served when a request asks for "/".
    pub index_file: String,
    /// Generic error page, used for HTTP/0.9 errors and read timeouts.
    pub error_file: String,
    /// Page served for malformed HTTP/1.x requests.
    pub bad_request_file: String,
    /// Page served when a requested resource does not exist.
    pub not_found_file: String,
    /// Product token sent in the Server header.
    pub server_token: String,
    /// Wall-clock budget for reading one request off the socket.
    pub read_timeout_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            document_root: PathBuf::from("www"),
            index_file: "index.html".to_string(),
            error_file: "error.html".to_string(),
            bad_request_file: "error400.html".to_string(),
            not_found_file: "error404.html".to_string(),
            server_token: "pyttewebb/0.1".to_string(),
            read_timeout_millis: 10_000,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("PYTTEWEBB_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read config file {path}"))?;
                let cfg = serde_yaml::from_str(&text)
                    .with_context(|| format!("cannot parse config file {path}"))?;
                Ok(cfg)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Applies a port given on the command line. An argument that does not
    /// parse as a port is ignored and the configured port stays in effect.
    pub fn override_port(&mut self, arg: &str) {
        match arg.parse() {
            Ok(port) => self.port = port,
            Err(_) => {
                tracing::warn!("Ignoring invalid port argument {arg:?}, using {}", self.port);
            }
        }
    }

    /// Startup validation. A port outside 1-65535 is a fatal error; the
    /// upper bound is enforced by the type, zero is rejected here.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("port number must be between 1 and 65535");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_millis)
    }
}
