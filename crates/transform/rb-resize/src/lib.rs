//! Resize transform: a streaming rechunker.
//!
//! Regroups a sequence of variably-sized input batches into output batches
//! bounded by a row-count or byte-size budget, preserving global row order.
//! Memory overhead is bounded by single-batch lookahead buffering: at most
//! one pending, unsplit remainder is held between calls.
//!
//! # Example
//!
//! ```
//! use rb_resize::{ResizeConfig, ResizeTransform};
//! use rb_traits::BatchTransform;
//!
//! let mut resize = ResizeTransform::new(ResizeConfig::by_rows(1000).unwrap());
//! // let (outputs, _) = resize.transform(batch)?;   // exact 1000-row slices
//! // let (tail, _) = resize.flush()?;               // the short remainder
//! ```

pub mod config;
pub mod transform;

pub use config::{
    ResizeConfig, ResizeConfiguration, ResizeLimit, MAX_MBYTES_PER_TABLE_KEY,
    MAX_ROWS_PER_TABLE_KEY, SIZE_TYPE_KEY,
};
pub use transform::ResizeTransform;
