//! Batch helpers: schema-checked concatenation and byte-size estimation.
//!
//! A batch is an immutable columnar table shared by reference. Slicing is
//! zero-copy (`RecordBatch::slice` shares the underlying buffers), and
//! concatenation is schema-checked: combining batches with incompatible
//! schemas yields a recoverable [`TransformError::SchemaMismatch`].

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use rb_error::{Result, TransformError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The unit of data exchanged between pipeline stages.
pub type Batch = Arc<RecordBatch>;

/// One megabyte, the unit of byte-budget parameters.
pub const MB: usize = 1024 * 1024;

/// In-memory Arrow data is roughly this many times larger than the Parquet
/// file it becomes on disk.
pub const LOCAL_TO_DISK: usize = 4;

/// Concatenates two batches, preserving row order (`left` rows first).
///
/// # Errors
///
/// Returns [`TransformError::SchemaMismatch`] when the schemas are
/// incompatible. Neither input is consumed on failure.
pub fn concat(left: &Batch, right: &Batch) -> Result<Batch> {
    let schema = left.schema();
    concat_batches(&schema, [left.as_ref(), right.as_ref()])
        .map(Arc::new)
        .map_err(|e| TransformError::SchemaMismatch(e.to_string()).into())
}

/// Estimates the in-memory byte size of a batch.
///
/// Sliced arrays share their parent's buffers, so `get_array_memory_size`
/// would report the whole backing allocation for every slice. This estimate
/// counts only the bytes the slice actually covers, falling back to the
/// allocation size for layouts that cannot report a slice size.
pub fn estimated_size(batch: &RecordBatch) -> usize {
    batch
        .columns()
        .iter()
        .map(|array| {
            let data = array.to_data();
            data.get_slice_memory_size()
                .unwrap_or_else(|_| array.get_array_memory_size())
        })
        .sum()
}

/// Which size the byte budget describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBasis {
    /// Budget describes the resulting on-disk (Parquet) file size
    #[default]
    Disk,

    /// Budget describes the in-process memory footprint
    Memory,
}

impl SizeBasis {
    /// Parses the `size_type` parameter value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "disk" => Some(Self::Disk),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    /// The `size_type` parameter value for this basis.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Memory => "memory",
        }
    }

    /// Converts a megabyte budget into the in-memory byte budget batches are
    /// measured against.
    ///
    /// `Disk` budgets describe the resulting file size, so they are inflated
    /// by [`LOCAL_TO_DISK`] before comparison against in-memory estimates.
    pub fn byte_budget(self, mbytes: f64) -> usize {
        let bytes = mbytes * MB as f64;
        match self {
            Self::Disk => (bytes * LOCAL_TO_DISK as f64) as usize,
            Self::Memory => bytes as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn int_batch(num_rows: usize) -> Batch {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let ids: Vec<i64> = (0..num_rows as i64).collect();
        Arc::new(RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(ids))]).unwrap())
    }

    fn string_batch(num_rows: usize) -> Batch {
        let schema = Arc::new(Schema::new(vec![Field::new("doc", DataType::Utf8, false)]));
        let docs: Vec<String> = (0..num_rows).map(|i| format!("doc-{i}")).collect();
        Arc::new(RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(docs))]).unwrap())
    }

    #[test]
    fn test_concat_preserves_order() {
        let merged = concat(&int_batch(3), &int_batch(2)).unwrap();
        assert_eq!(merged.num_rows(), 5);

        let ids = merged
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(ids.values().to_vec(), vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_concat_schema_mismatch() {
        let err = concat(&int_batch(3), &string_batch(3)).unwrap_err();
        assert!(matches!(
            err,
            rb_error::RbError::Transform(TransformError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_estimated_size_of_slice_is_proportional() {
        let batch = int_batch(1000);
        let full = estimated_size(&batch);
        let half = estimated_size(&batch.slice(0, 500));

        assert_eq!(full, 8000);
        assert_eq!(half, 4000);
    }

    #[test]
    fn test_byte_budget_scaling() {
        assert_eq!(SizeBasis::Memory.byte_budget(1.0), MB);
        assert_eq!(SizeBasis::Disk.byte_budget(1.0), MB * LOCAL_TO_DISK);
        assert_eq!(SizeBasis::Memory.byte_budget(0.5), MB / 2);
    }

    #[test]
    fn test_size_basis_parse() {
        assert_eq!(SizeBasis::parse("disk"), Some(SizeBasis::Disk));
        assert_eq!(SizeBasis::parse("memory"), Some(SizeBasis::Memory));
        assert_eq!(SizeBasis::parse("tape"), None);
        assert_eq!(SizeBasis::default(), SizeBasis::Disk);
    }
}
