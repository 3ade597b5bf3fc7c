//! # augur-core
//!
//! Core types shared across all Augur crates:
//! - Entity structs for users, questions and viewing history
//! - The question status lifecycle
//! - Interest normalization applied at every crate boundary
//! - The resolution-date heuristic and note limits
//! - Serde helpers for the caller-facing timestamp format
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod interest;
pub mod resolution;
pub mod timestamp;
