//! pyttewebb - a small static file webserver
//!
//! Serves files over HTTP/1.1 while also accepting the older HTTP/1.0 and
//! header-less HTTP/0.9 request forms.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
