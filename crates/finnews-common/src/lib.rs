//! Finnews Common Library
//!
//! Shared types, utilities, and error handling for the finnews workspace.
//!
//! # Overview
//!
//! - **Types**: the [`Document`] value, its [`Meta`] mapping and the per-batch
//!   [`IngestResult`] counters
//! - **Error Handling**: [`FinnewsError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use finnews_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> finnews_common::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{FinnewsError, Result};
pub use types::{Document, IngestResult, Meta};
