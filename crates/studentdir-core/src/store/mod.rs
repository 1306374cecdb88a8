//! Durable storage for the student collection.
//!
//! The whole collection lives in one serialized JSON blob. The medium only
//! supports reading the whole blob and overwriting it; there are no partial
//! writes. The blob carries a revision counter so writers can detect that
//! someone else saved in between their read and their write.
//!
//! The first load on an empty medium stores and returns the seed set.

pub mod error;
pub mod medium;
pub mod persistent;
pub mod seed;

pub use error::StoreError;
pub use medium::{FileMedium, MemoryMedium, StorageMedium};
pub use persistent::{StoredCollection, StudentStore};
pub use seed::seed_students;
