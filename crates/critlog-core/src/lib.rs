//! # critlog-core
//!
//! A library for reading the Android critical event log
//! (`/data/misc/critical-events/critical_event_log.pb`) and rendering it as
//! readable text.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`source`]: Obtaining the log bytes from a file or a device
//! - [`schema`]: Protobuf messages of the on-device format
//! - [`wire`]: Raw wire format scanning for fields the schema does not cover
//! - [`decode`]: Bytes to [`LogStorage`]
//! - [`model`]: Event kinds, payloads and process descriptors
//! - [`filter`]: Selecting events by kind
//! - [`report`]: Text rendering and debug statistics
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use critlog_core::{decode_storage, EventFilter, ReportConfig, ReportRenderer};
//! use std::fs;
//!
//! let data = fs::read("critical_event_log.pb")?;
//! let storage = decode_storage(&data, "critical_event_log.pb")?;
//!
//! let config = ReportConfig::new().filter(EventFilter::parse(["anr", "java_crash"])?);
//! print!("{}", ReportRenderer::new(config).render(&storage));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod decode;
pub mod error;
pub mod filter;
pub mod model;
pub mod report;
pub mod schema;
pub mod source;
pub mod wire;

// Re-export primary types for convenience
pub use decode::decode_storage;
pub use error::{Error, ErrorClass, Result};
pub use filter::EventFilter;
pub use model::{Event, EventKind, LogStorage, Payload, ProcessClass, ProcessInfo};
pub use report::{DebugSummary, EventFormatter, ReportConfig, ReportRenderer};
pub use source::{DeviceConfig, DevicePull, LocalFile, Source, DEVICE_LOG_PATH};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
