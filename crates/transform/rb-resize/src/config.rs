//! Configuration for the resize transform.

use rb_error::{ConfigError, Result};
use rb_traits::{elide_sensitive, reject_unknown, TransformConfiguration};
use rb_types::{ParamMap, ParamSpec, ParamValue, SizeBasis};
use serde::{Deserialize, Serialize};

/// Maximum number of rows per emitted batch (row mode).
pub const MAX_ROWS_PER_TABLE_KEY: &str = "max_rows_per_table";

/// Maximum size in megabytes per emitted batch (byte mode).
pub const MAX_MBYTES_PER_TABLE_KEY: &str = "max_mbytes_per_table";

/// How the megabyte budget is measured (`disk` or `memory`).
pub const SIZE_TYPE_KEY: &str = "size_type";

/// The splitting budget. Exactly one flavour is active per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResizeLimit {
    /// Emit batches of exactly this many rows
    Rows(usize),

    /// Emit batches of at most this many (in-memory estimated) bytes
    Bytes {
        /// Effective in-memory byte budget, already scaled for the basis
        budget: usize,

        /// Which size the user-facing budget describes
        basis: SizeBasis,

        /// The user-facing budget in megabytes, kept for run metadata
        mbytes: f64,
    },
}

/// Validated, immutable resize configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// The active splitting budget
    pub limit: ResizeLimit,
}

impl ResizeConfig {
    /// Row-mode configuration: emit batches of exactly `rows` rows.
    ///
    /// # Errors
    ///
    /// Fails when `rows` is zero; the active limit must be positive.
    pub fn by_rows(rows: usize) -> Result<Self> {
        if rows == 0 {
            return Err(ConfigError::InvalidValue {
                name: MAX_ROWS_PER_TABLE_KEY.into(),
                reason: "must be positive".into(),
            }
            .into());
        }
        Ok(Self {
            limit: ResizeLimit::Rows(rows),
        })
    }

    /// Byte-mode configuration: emit batches of at most `mbytes` megabytes,
    /// measured per `basis`.
    ///
    /// # Errors
    ///
    /// Fails when `mbytes` is not a positive number.
    pub fn by_mbytes(mbytes: f64, basis: SizeBasis) -> Result<Self> {
        if mbytes.is_nan() || mbytes <= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: MAX_MBYTES_PER_TABLE_KEY.into(),
                reason: "must be positive".into(),
            }
            .into());
        }
        Ok(Self {
            limit: ResizeLimit::Bytes {
                budget: basis.byte_budget(mbytes),
                basis,
                mbytes,
            },
        })
    }
}

/// Configuration contract for the resize transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeConfiguration;

impl ResizeConfiguration {
    /// Creates the resize configuration contract.
    pub fn new() -> Self {
        Self
    }
}

impl TransformConfiguration for ResizeConfiguration {
    type Config = ResizeConfig;

    fn name(&self) -> &str {
        "resize"
    }

    fn declare_parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(
                MAX_ROWS_PER_TABLE_KEY,
                -1_i64,
                "Max number of rows per emitted batch",
            ),
            ParamSpec::new(
                MAX_MBYTES_PER_TABLE_KEY,
                -1.0_f64,
                "Max batch size (MB). Size is measured according to the size_type parameter",
            ),
            ParamSpec::new(
                SIZE_TYPE_KEY,
                SizeBasis::default().as_str(),
                "Determines how size is measured when using the max_mbytes_per_table option. \
                 'memory' measures the in-process footprint and 'disk' estimates the \
                 resulting file size",
            )
            .with_allowed(&["disk", "memory"]),
        ]
    }

    fn validate_and_apply(&self, raw: &ParamMap) -> Result<ResizeConfig> {
        reject_unknown(raw, &self.declare_parameters())?;

        let rows = match raw.get(MAX_ROWS_PER_TABLE_KEY) {
            Some(value) => value.as_int().ok_or_else(|| ConfigError::InvalidValue {
                name: MAX_ROWS_PER_TABLE_KEY.into(),
                reason: "expected an integer".into(),
            })?,
            None => -1,
        };
        let mbytes = match raw.get(MAX_MBYTES_PER_TABLE_KEY) {
            Some(value) => value.as_float().ok_or_else(|| ConfigError::InvalidValue {
                name: MAX_MBYTES_PER_TABLE_KEY.into(),
                reason: "expected a number".into(),
            })?,
            None => -1.0,
        };
        let basis = match raw.get(SIZE_TYPE_KEY) {
            Some(value) => {
                let s = value.as_str().ok_or_else(|| ConfigError::InvalidValue {
                    name: SIZE_TYPE_KEY.into(),
                    reason: "expected a string".into(),
                })?;
                SizeBasis::parse(s).ok_or_else(|| ConfigError::InvalidValue {
                    name: SIZE_TYPE_KEY.into(),
                    reason: "expected \"disk\" or \"memory\"".into(),
                })?
            }
            None => SizeBasis::default(),
        };

        match (rows > 0, mbytes > 0.0) {
            (true, true) => Err(ConfigError::Conflicting(format!(
                "{MAX_ROWS_PER_TABLE_KEY} and {MAX_MBYTES_PER_TABLE_KEY} are both set; \
                 only one should be present"
            ))
            .into()),
            (false, false) => Err(ConfigError::Missing(format!(
                "one of {MAX_ROWS_PER_TABLE_KEY} or {MAX_MBYTES_PER_TABLE_KEY} \
                 must be positive"
            ))
            .into()),
            (true, false) => ResizeConfig::by_rows(rows as usize),
            (false, true) => ResizeConfig::by_mbytes(mbytes, basis),
        }
    }

    fn public_metadata(&self, config: &ResizeConfig) -> ParamMap {
        let (rows, mbytes, basis) = match &config.limit {
            ResizeLimit::Rows(rows) => (*rows as i64, -1.0, SizeBasis::default()),
            ResizeLimit::Bytes { mbytes, basis, .. } => (-1, *mbytes, *basis),
        };
        let map: ParamMap = [
            (MAX_ROWS_PER_TABLE_KEY.to_string(), ParamValue::Int(rows)),
            (
                MAX_MBYTES_PER_TABLE_KEY.to_string(),
                ParamValue::Float(mbytes),
            ),
            (SIZE_TYPE_KEY.to_string(), ParamValue::Str(basis.as_str().into())),
        ]
        .into_iter()
        .collect();
        elide_sensitive(map, &self.declare_parameters())
    }
}
