//! Per-partition transform runner.
//!
//! The external runtime schedules one [`PartitionRunner`] per partition and
//! feeds it batches in partition order. The runner enforces the transform
//! lifecycle (`transform*` then exactly one `flush`), classifies errors into
//! continue/abort decisions, and merges per-call statistics into the
//! partition total that the runtime aggregates across partitions.

use rb_error::{classify_error, ErrorCategory, RbError, Result};
use rb_traits::BatchTransform;
use rb_types::{Batch, Stats};
use tracing::{debug, warn};

/// Drives one transform instance over one partition.
///
/// Recoverable errors (data-shape problems on a single input) are counted in
/// the partition stats and the partition continues; fatal errors propagate.
/// [`finish`](PartitionRunner::finish) consumes the runner, so a second flush
/// is unrepresentable through this API.
pub struct PartitionRunner<T: BatchTransform> {
    transform: T,
    stats: Stats,
}

impl<T: BatchTransform> PartitionRunner<T> {
    /// Creates a runner around a freshly constructed transform instance.
    pub fn new(transform: T) -> Self {
        Self {
            transform,
            stats: Stats::new(),
        }
    }

    /// Feeds the next batch of the partition to the transform.
    ///
    /// Returns the batches to hand to durable storage, in order. On a
    /// recoverable transform error the batch is counted as rejected, nothing
    /// is emitted, and the partition stays alive.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors (contract violations); the runtime should
    /// abort the partition.
    pub fn process(&mut self, batch: Batch) -> Result<Vec<Batch>> {
        self.stats.add("source_batches", 1.0);
        self.stats.add("source_rows", batch.num_rows() as f64);

        match self.transform.transform(batch) {
            Ok((outputs, call_stats)) => {
                self.stats.merge(call_stats);
                self.record_outputs(&outputs);
                Ok(outputs)
            }
            Err(e) => self.recover(e),
        }
    }

    /// Drains the transform and returns the final outputs with the merged
    /// partition statistics.
    pub fn finish(mut self) -> Result<(Vec<Batch>, Stats)> {
        let (outputs, call_stats) = self.transform.flush()?;
        self.stats.merge(call_stats);
        self.record_outputs(&outputs);
        debug!(transform = self.transform.name(), "partition drained");
        Ok((outputs, self.stats))
    }

    /// Statistics merged so far, including the runner's own counters.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn record_outputs(&mut self, outputs: &[Batch]) {
        self.stats.add("result_batches", outputs.len() as f64);
        self.stats.add(
            "result_rows",
            outputs.iter().map(|b| b.num_rows()).sum::<usize>() as f64,
        );
    }

    fn recover(&mut self, error: RbError) -> Result<Vec<Batch>> {
        match classify_error(&error) {
            ErrorCategory::Recoverable => {
                warn!(
                    transform = self.transform.name(),
                    error = %error,
                    "recoverable transform error, partition continues"
                );
                self.stats.add("transform_errors", 1.0);
                Ok(Vec::new())
            }
            ErrorCategory::Fatal => Err(error),
        }
    }
}
