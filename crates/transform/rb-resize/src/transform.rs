//! The rechunking algorithm.

use crate::config::{ResizeConfig, ResizeLimit};
use rb_error::{Result, TransformError};
use rb_traits::{BatchTransform, TransformOutput};
use rb_types::{batch, Batch, Stats};
use std::sync::Arc;
use tracing::{debug, trace};

/// Regroups incoming batches into outputs bounded by a row or byte budget.
///
/// At most one pending remainder is buffered between calls. On every call the
/// buffer is concatenated with the incoming batch, full chunks are sliced off
/// (zero-copy), and the short tail becomes the new buffer. [`flush`] emits
/// the tail without re-applying the budget.
///
/// On a schema mismatch between the buffer and the incoming batch, the buffer
/// is retained and the incoming batch is rejected with a recoverable error:
/// previously buffered rows keep their place in the output order, and the
/// caller (which still holds the rejected batch) decides its disposition.
///
/// [`flush`]: BatchTransform::flush
#[derive(Debug)]
pub struct ResizeTransform {
    limit: ResizeLimit,
    buffer: Option<Batch>,
    flushed: bool,
}

impl ResizeTransform {
    /// Creates a resize transform for one partition.
    pub fn new(config: ResizeConfig) -> Self {
        Self {
            limit: config.limit,
            buffer: None,
            flushed: false,
        }
    }

    /// Rows currently buffered and not yet emitted.
    pub fn buffered_rows(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.num_rows())
    }

    /// Concatenates the buffer (if any) with the incoming batch.
    ///
    /// On schema mismatch the buffer is retained and the incoming batch is
    /// rejected.
    fn merge_buffer(&mut self, incoming: Batch) -> Result<Batch> {
        match self.buffer.take() {
            None => Ok(incoming),
            Some(buffered) => {
                trace!(
                    buffered_rows = buffered.num_rows(),
                    incoming_rows = incoming.num_rows(),
                    "concatenating buffer with incoming batch"
                );
                match batch::concat(&buffered, &incoming) {
                    Ok(merged) => Ok(merged),
                    Err(e) => {
                        self.buffer = Some(buffered);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Slices off exact `limit`-row chunks; the remainder (< limit rows)
    /// becomes the new buffer.
    fn split_by_rows(&mut self, working: Batch, limit: usize) -> Vec<Batch> {
        let total = working.num_rows();
        let mut outputs = Vec::new();
        let mut start = 0;

        while total - start >= limit {
            trace!(start, limit, "emitting row-budget slice");
            outputs.push(Arc::new(working.slice(start, limit)));
            start += limit;
        }
        if start < total {
            self.buffer = Some(Arc::new(working.slice(start, total - start)));
        }
        outputs
    }

    /// Scans row-by-row, closing a chunk whenever the running size estimate
    /// crosses `budget`. The tail past the last boundary becomes the new
    /// buffer, even when below budget; emission only happens at a full
    /// crossing within a single call.
    fn split_by_bytes(&mut self, working: Batch, budget: usize) -> Vec<Batch> {
        let total_rows = working.num_rows();
        let total_size = batch::estimated_size(&working);
        if total_size <= budget {
            trace!(total_size, budget, "under byte budget, deferring emission");
            // an empty batch has nothing worth carrying to the flush
            if total_rows > 0 {
                self.buffer = Some(working);
            }
            return Vec::new();
        }

        let mut outputs = Vec::new();
        let mut start = 0;
        let mut running = 0usize;

        for row in 0..total_rows {
            let row_size = batch::estimated_size(&working.slice(row, 1));
            running += row_size;
            // A chunk never closes empty: a single row larger than the
            // budget forms its own chunk once the next row arrives.
            if running > budget && row > start {
                trace!(start, end = row, running, "emitting byte-budget slice");
                outputs.push(Arc::new(working.slice(start, row - start)));
                start = row;
                running = row_size;
            }
        }
        if start < total_rows {
            self.buffer = Some(Arc::new(working.slice(start, total_rows - start)));
        }
        outputs
    }
}

impl BatchTransform for ResizeTransform {
    fn transform(&mut self, batch: Batch) -> Result<TransformOutput> {
        if self.flushed {
            return Err(
                TransformError::ContractViolation("transform called after flush".into()).into(),
            );
        }
        debug!(rows = batch.num_rows(), "received batch");

        let working = self.merge_buffer(batch)?;
        let outputs = match self.limit {
            ResizeLimit::Rows(limit) => self.split_by_rows(working, limit),
            ResizeLimit::Bytes { budget, .. } => self.split_by_bytes(working, budget),
        };

        debug!(
            emitted = outputs.len(),
            buffered_rows = self.buffered_rows(),
            "batch resized"
        );
        Ok((outputs, Stats::new()))
    }

    fn flush(&mut self) -> Result<TransformOutput> {
        if self.flushed {
            return Err(TransformError::ContractViolation("flush called twice".into()).into());
        }
        self.flushed = true;

        let outputs: Vec<Batch> = self.buffer.take().into_iter().collect();
        debug!(
            rows = outputs.first().map_or(0, |b| b.num_rows()),
            "flushing buffered remainder"
        );
        Ok((outputs, Stats::new()))
    }

    fn name(&self) -> &str {
        "resize"
    }
}
