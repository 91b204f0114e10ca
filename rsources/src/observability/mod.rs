//! Logging setup.

mod subscriber;

pub use subscriber::{init_tracing, LogFormat, LogSettings};
