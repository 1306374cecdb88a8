//! Data models for the student directory.
//!
//! - `Student`: the stored record
//! - `NewStudent`, `StudentPatch`: create and update inputs
//! - `StudentFilter`, `SortSpec`: list query and display ordering
//! - `ValidationError`: form-level input checks run by front ends

pub mod query;
pub mod student;
pub mod validation;

pub use query::{FilterField, SortColumn, SortDirection, SortSpec, StudentFilter};
pub use student::{placeholder_photo_url, NewStudent, Student, StudentPatch};
pub use validation::{validate_email, ValidationError};
