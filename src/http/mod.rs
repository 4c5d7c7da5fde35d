//! HTTP protocol implementation.
//!
//! This module implements the request/response layer for the three protocol
//! variants the server understands: HTTP/0.9, HTTP/1.0 and HTTP/1.1.
//!
//! # Architecture
//!
//! - **`request`**: parsed request representation and the command enum
//! - **`parser`**: tokenizes and validates a raw request string
//! - **`response`**: response representation and head-block serialization
//! - **`compose`**: builds and sends responses using the file store
//! - **`connection`**: one accepted connection, driven as a state machine
//!
//! # Connection State Machine
//!
//! Each client connection goes through exactly one exchange:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until \r\n\r\n or timeout
//!        └──────┬──────┘
//!               │ Request parsed (or fallback synthesized)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Branch on (validity, command)
//!        └──────┬───────────┘
//!               │ Response written
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Trailing \r\n\r\n
//!        └──────┬───────────┘
//!               │
//!               └─ Closed (always; no keep-alive)
//! ```

pub mod compose;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
