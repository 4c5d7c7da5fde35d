//! Listening socket and process lifecycle.

pub mod control;
pub mod listener;
pub mod shutdown;
