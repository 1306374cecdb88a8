//! Identity gate consulted by front ends.
//!
//! This module provides:
//! - `Identity`: the "who is signed in" contract (`current_user`, `is_loading`)
//! - `Session`: a file-backed implementation with automatic expiry
//!
//! The record service never checks identity. Front ends hide or refuse
//! mutations when no user is signed in.

pub mod identity;
pub mod session;

pub use identity::{Identity, User};
pub use session::{Session, SessionData};
