//! Record service module.
//!
//! This module provides `RecordService`, the only component that reads or
//! writes the student store. Every call is async and waits out an artificial
//! latency, so callers are written against the same suspension points a
//! remote backend would impose. `StudentApi` is the seam such a backend
//! would implement.

pub mod error;
pub mod service;

pub use error::ServiceError;
pub use service::{LatencyProfile, RecordService, StudentApi};
