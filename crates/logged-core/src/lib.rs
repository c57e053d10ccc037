//! Logged Core Library
//!
//! Structured, leveled logging to single-line JSON (or plain text) records.
//!
//! ## Overview
//!
//! Callers emit entries (message plus string key/value metadata) through a
//! [`Logger`]. The logger merges per-call metadata over its defaults, drops
//! debug entries from call sites that are not enabled, and hands the entry to
//! a [`Serializer`], which encodes it as one line and flushes it to its sink.
//!
//! ```text
//! caller ──► Logger (gating + merge) ──► Serializer (encode + flush) ──► sink
//! ```
//!
//! Each JSON line looks like:
//!
//! ```text
//! {"timestamp":"2024-01-01T00:00:00.000000000Z","level":"info","message":"started","data":{"a":"1"}}
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use logged_core::{Data, JsonSerializer, Logger};
//!
//! let log = Logger::new(Arc::new(JsonSerializer::stdout()))
//!     .with_defaults(&Data::from([("app_name".into(), "fldsmdfr".into())]));
//!
//! log.info("an info message", None)?;
//!
//! let request_log = log.with_defaults(&Data::from([("request_id".into(), "42".into())]));
//! request_log.info("handled", None)?;
//!
//! if logged_core::is_debug!(log) {
//!     logged_core::debug!(log, "an expensive debug message")?;
//! }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod escape;
pub mod layer;
pub mod logger;
pub mod serializer;
pub mod sink;

// Re-exports
pub use config::{parse_pair, Config};
pub use entry::{Data, Entry, Level};
pub use error::{LogError, LogResult};
pub use layer::LoggedLayer;
pub use logger::{merge, DebugScopes, Logger, WILDCARD};
pub use serializer::{Format, JsonSerializer, Serializer, TextSerializer};
pub use sink::{open_append, MemorySink};
