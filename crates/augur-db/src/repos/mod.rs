//! Repository modules implementing operations for all Augur entities.
//!
//! Each module adds methods to `AugurDb` via `impl AugurDb` blocks.

pub mod question;
pub mod user;
pub mod view;
