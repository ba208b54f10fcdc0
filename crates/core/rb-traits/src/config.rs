//! Configuration contract.
//!
//! A transform declares its recognized parameters, validates the captured
//! values into an immutable config, and projects the subset of parameters
//! safe to persist as run metadata.

use rb_error::{ConfigError, Result};
use rb_types::{ParamMap, ParamSpec};
use std::fmt;

/// Parameter declaration, validation and metadata projection for a transform.
///
/// The launcher builds a CLI surface from
/// [`declare_parameters`](TransformConfiguration::declare_parameters), then
/// hands captured values back through
/// [`validate_and_apply`](TransformConfiguration::validate_and_apply). A
/// failed validation has no side effects, and the run does not start.
pub trait TransformConfiguration {
    /// The validated, immutable configuration this contract produces.
    type Config: Clone + fmt::Debug;

    /// Short transform name, used as the CLI parameter prefix.
    fn name(&self) -> &str;

    /// Declares the recognized parameters.
    fn declare_parameters(&self) -> Vec<ParamSpec>;

    /// Validates captured parameter values into a finalized configuration.
    ///
    /// Fails when mutually exclusive parameters are both set or both unset,
    /// when a value violates its domain, or when an undeclared parameter is
    /// present.
    fn validate_and_apply(&self, raw: &ParamMap) -> Result<Self::Config>;

    /// Projects the parameters safe to persist as run metadata.
    ///
    /// Sensitive parameters (access keys, secrets) are elided. Pure function
    /// of the configuration.
    fn public_metadata(&self, config: &Self::Config) -> ParamMap;
}

/// Rejects parameters that are not declared by any spec.
pub fn reject_unknown(raw: &ParamMap, specs: &[ParamSpec]) -> Result<()> {
    for key in raw.keys() {
        if !specs.iter().any(|spec| spec.name == *key) {
            return Err(ConfigError::UnknownParameter(key.clone()).into());
        }
    }
    Ok(())
}

/// Removes values whose spec is marked sensitive.
pub fn elide_sensitive(mut map: ParamMap, specs: &[ParamSpec]) -> ParamMap {
    for spec in specs {
        if spec.sensitive {
            map.remove(&spec.name);
        }
    }
    map
}
