//! In-memory view cache for front ends.
//!
//! This module provides the `ViewCache`, which holds the active filter and
//! sort, fetches through a `StudentApi`, and publishes a ready-to-render
//! snapshot. The snapshot is a derived projection that can always be
//! refetched; the store remains the source of truth.
//!
//! Overlapping fetches are not cancelled. Each one carries a request epoch
//! and only the most recently issued one may publish.

pub mod view;

pub use view::{ViewCache, ViewSnapshot, ViewStatus};
