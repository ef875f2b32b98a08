//! Observability for the valve catalog tools.
//!
//! This crate provides:
//! - `RequestId` - correlation id shared by the log lines of one operation
//! - `StructuredLogger` - JSON or human log lines with component context
//! - `LogBuilder` - fluent structured fields

mod context;
mod logging;

pub use context::RequestId;
pub use logging::*;
