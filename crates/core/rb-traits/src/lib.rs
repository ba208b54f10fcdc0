//! Core contracts for rebatch.
//!
//! This crate defines the two abstractions every transform implements:
//! - [`BatchTransform`] - the per-partition transform lifecycle
//! - [`TransformConfiguration`] - parameter declaration, validation and
//!   metadata projection

pub mod config;
pub mod transform;

pub use config::*;
pub use transform::*;
