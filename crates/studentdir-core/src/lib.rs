//! Core library for the student directory.
//!
//! Layers, leaf-first:
//! - [`store`]: durable whole-collection storage with seed fallback
//! - [`api`]: the record service, an async façade over the store
//! - [`cache`]: the view cache holding the filtered/sorted projection
//!
//! Supporting modules cover the data model, the identity gate consulted by
//! front ends, configuration, and small formatting helpers.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{LatencyProfile, RecordService, ServiceError, StudentApi};
pub use cache::{ViewCache, ViewSnapshot, ViewStatus};
pub use config::Config;
pub use models::{
    FilterField, NewStudent, SortColumn, SortDirection, SortSpec, Student, StudentFilter,
    StudentPatch, ValidationError,
};
pub use store::{StoreError, StudentStore};
