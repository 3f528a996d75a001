//! Simulated one-time passcodes for phone login.
//!
//! Codes live in process memory only; delivery is a log line.

mod error;
mod registry;
mod types;

pub use error::OtpError;
pub use registry::OtpRegistry;
pub use types::*;
