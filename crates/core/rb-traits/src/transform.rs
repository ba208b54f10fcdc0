//! Transform lifecycle contract.

use rb_error::{Result, TransformError};
use rb_types::{Batch, Stats};

/// Batches emitted by one call, plus the statistics for that call.
pub type TransformOutput = (Vec<Batch>, Stats);

/// The per-partition transform lifecycle.
///
/// A transform instance is stateful and strictly single-threaded: the runtime
/// creates one instance per partition, feeds it batches in partition order,
/// and finally drains it. The lifecycle is
/// `Created → Active (transform calls) → Flushed (terminal)`.
///
/// # Buffering
///
/// [`transform`](BatchTransform::transform) may retain unconsumed rows
/// internally instead of emitting them immediately; whatever is retained is
/// emitted by the single [`flush`](BatchTransform::flush) call at partition
/// end. Across all calls, emitted rows preserve input arrival order.
///
/// # Errors
///
/// Data-shape failures on a single input (for example a schema mismatch with
/// buffered rows) are recoverable: the call returns an error, no outputs are
/// emitted, and the partition continues with subsequent batches. Calling
/// `transform` after `flush`, or `flush` twice, is a
/// [`TransformError::ContractViolation`] - a caller bug, not a data
/// condition.
pub trait BatchTransform: Send {
    /// Processes one input batch, in partition arrival order.
    fn transform(&mut self, batch: Batch) -> Result<TransformOutput>;

    /// Drains retained state. Called exactly once, after the last
    /// `transform` call for the partition; the instance is terminal
    /// afterwards.
    fn flush(&mut self) -> Result<TransformOutput>;

    /// Returns the name of this transform for logging.
    fn name(&self) -> &str {
        "transform"
    }
}

/// A transform that passes batches through unchanged.
///
/// Useful as a default, a placeholder, and for exercising the runtime
/// without any data-dependent behavior.
#[derive(Debug, Default)]
pub struct NoopTransform {
    flushed: bool,
}

impl NoopTransform {
    /// Creates a new noop transform.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BatchTransform for NoopTransform {
    fn transform(&mut self, batch: Batch) -> Result<TransformOutput> {
        if self.flushed {
            return Err(
                TransformError::ContractViolation("transform called after flush".into()).into(),
            );
        }
        let mut stats = Stats::new();
        stats.add("rows", batch.num_rows() as f64);
        Ok((vec![batch], stats))
    }

    fn flush(&mut self) -> Result<TransformOutput> {
        if self.flushed {
            return Err(TransformError::ContractViolation("flush called twice".into()).into());
        }
        self.flushed = true;
        Ok((Vec::new(), Stats::new()))
    }

    fn name(&self) -> &str {
        "noop"
    }
}
