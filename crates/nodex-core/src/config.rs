//! Module: config
//! Responsibility: per-index runtime knobs and their TOML loading.
//! Does not own: index identity (descriptor) or storage layout.

use crate::{MAX_INDEX_FIELDS, error::IndexError};
use serde::{Deserialize, Serialize};

///
/// FailureWitness
///
/// Which failure a fused lifecycle operation surfaces when more than one
/// slot fails. Every slot is still attempted; only the reported error
/// differs.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureWitness {
    /// Error of the first failing slot in fan-out order.
    #[default]
    FirstSlot,

    /// Error of the last failing slot in fan-out order.
    LastSlot,
}

///
/// IndexConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Widest composite key the index accepts.
    pub max_key_arity: usize,

    /// Check that ordered progressors really emit in key order, reporting
    /// corruption otherwise.
    pub verify_order: bool,

    pub failure_witness: FailureWitness,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_key_arity: MAX_INDEX_FIELDS,
            verify_order: true,
            failure_witness: FailureWitness::default(),
        }
    }
}

impl IndexConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, IndexError> {
        let config: Self = toml::from_str(source)
            .map_err(|err| IndexError::config(format!("invalid index config: {err}")))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.max_key_arity == 0 || self.max_key_arity > MAX_INDEX_FIELDS {
            return Err(IndexError::config(format!(
                "max_key_arity must be between 1 and {MAX_INDEX_FIELDS}, got {}",
                self.max_key_arity
            )));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_failure_witness(mut self, witness: FailureWitness) -> Self {
        self.failure_witness = witness;
        self
    }

    #[must_use]
    pub const fn with_verify_order(mut self, verify: bool) -> Self {
        self.verify_order = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, ErrorOrigin};

    #[test]
    fn empty_document_yields_defaults() {
        let config = IndexConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, IndexConfig::default());
        assert_eq!(config.failure_witness, FailureWitness::FirstSlot);
        assert!(config.verify_order);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = IndexConfig::from_toml_str(
            r#"
            max_key_arity = 2
            verify_order = false
            failure_witness = "last_slot"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.max_key_arity, 2);
        assert!(!config.verify_order);
        assert_eq!(config.failure_witness, FailureWitness::LastSlot);
    }

    #[test]
    fn out_of_range_arity_is_rejected() {
        for arity in [0, MAX_INDEX_FIELDS + 1] {
            let err = IndexConfig::from_toml_str(&format!("max_key_arity = {arity}"))
                .expect_err("arity outside bounds should fail");

            assert_eq!(err.origin, ErrorOrigin::Config);
            assert_eq!(err.class, ErrorClass::Unsupported);
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = IndexConfig::from_toml_str("cache_size = 10")
            .expect_err("unknown key should fail");

        assert_eq!(err.origin, ErrorOrigin::Config);
        assert!(err.message.starts_with("invalid index config"));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = IndexConfig::default().with_failure_witness(FailureWitness::LastSlot);
        let json = serde_json::to_string(&config).expect("config should serialize");
        let back: IndexConfig = serde_json::from_str(&json).expect("config should deserialize");

        assert_eq!(back, config);
    }
}
