//! Shared types for rebatch.
//!
//! This crate defines the value types that cross component boundaries:
//! - [`Batch`] and the batch helpers in [`batch`] (concat, size estimation)
//! - [`Stats`] - per-call statistics merged additively by the runtime
//! - [`ParamValue`] / [`ParamSpec`] - the configuration contract surface

pub mod batch;
pub mod params;
pub mod stats;

pub use batch::{Batch, SizeBasis, LOCAL_TO_DISK, MB};
pub use params::{ParamMap, ParamSpec, ParamValue};
pub use stats::Stats;
