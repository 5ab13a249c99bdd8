//! Observability
//!
//! Structured JSON logging for compilation and execution events.
//!
//! ```ignore
//! use filterdsl::observability::{Logger, Severity};
//!
//! let logger = Logger::new(Severity::Trace);
//! logger.trace("QUERY_COMPILED", &[("entity", "users"), ("joins", "1")]);
//! ```

mod logger;

pub use logger::{format_line, Logger, Severity};
