//! Configuration types

use crate::error::{ConfigError, ScoopError, ScoopResult};
use crate::identifier::IdentifierPolicy;
use crate::transformer::TransformerSet;
use serde::{Deserialize, Serialize};

/// Redshift column ceiling past which queries slow down badly.
pub const DEFAULT_MAX_COLUMNS: usize = 300;

/// Largest varchar Redshift accepts (64k - 1).
pub const DEFAULT_MAX_VARCHAR_BYTES: u64 = 65535;

/// Redshift identifier byte limit.
pub const DEFAULT_MAX_IDENTIFIER_LEN: usize = 127;

/// Migration engine configuration.
///
/// Keys missing from a TOML document take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigratorConfig {
    /// Column ceiling for add and update migrations
    pub max_columns: usize,
    /// Inclusive varchar size ceiling
    pub max_varchar_bytes: u64,
    /// Inclusive identifier byte-length ceiling
    pub max_identifier_len: usize,
    pub identifier_policy: IdentifierPolicy,
    /// Version given to a table that has never been stored
    pub initial_version: u64,
    /// Transformers a column may use
    pub transformers: TransformerSet,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            max_columns: DEFAULT_MAX_COLUMNS,
            max_varchar_bytes: DEFAULT_MAX_VARCHAR_BYTES,
            max_identifier_len: DEFAULT_MAX_IDENTIFIER_LEN,
            identifier_policy: IdentifierPolicy::Permissive,
            initial_version: 1,
            transformers: TransformerSet::standard(),
        }
    }
}

impl MigratorConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(s: &str) -> ScoopResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    ///
    /// Environment variables:
    /// - `SCOOP_MAX_COLUMNS`
    /// - `SCOOP_MAX_VARCHAR_BYTES`
    /// - `SCOOP_MAX_IDENTIFIER_LEN`
    /// - `SCOOP_IDENTIFIER_POLICY` (`permissive` or `strict`)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_columns: std::env::var("SCOOP_MAX_COLUMNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_columns),
            max_varchar_bytes: std::env::var("SCOOP_MAX_VARCHAR_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_varchar_bytes),
            max_identifier_len: std::env::var("SCOOP_MAX_IDENTIFIER_LEN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_identifier_len),
            identifier_policy: match std::env::var("SCOOP_IDENTIFIER_POLICY").as_deref() {
                Ok("strict") => IdentifierPolicy::Strict,
                Ok("permissive") => IdentifierPolicy::Permissive,
                _ => defaults.identifier_policy,
            },
            ..defaults
        }
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - every ceiling is greater than 0
    /// - the transformer allow-list is not empty
    pub fn validate(&self) -> ScoopResult<()> {
        if self.max_columns == 0 {
            return Err(invalid(
                "max_columns",
                self.max_columns.to_string(),
                "max_columns must be greater than 0",
            ));
        }

        if self.max_varchar_bytes == 0 {
            return Err(invalid(
                "max_varchar_bytes",
                self.max_varchar_bytes.to_string(),
                "max_varchar_bytes must be greater than 0",
            ));
        }

        if self.max_identifier_len == 0 {
            return Err(invalid(
                "max_identifier_len",
                self.max_identifier_len.to_string(),
                "max_identifier_len must be greater than 0",
            ));
        }

        if self.transformers.is_empty() {
            return Err(invalid(
                "transformers",
                "[]".to_string(),
                "at least one transformer must be allowed",
            ));
        }

        Ok(())
    }

    /// Check a table or column name against the configured identifier rule.
    pub fn is_valid_identifier(&self, name: &str) -> bool {
        self.identifier_policy
            .is_valid(name, self.max_identifier_len)
    }
}

fn invalid(field: &str, value: String, reason: &str) -> ScoopError {
    ScoopError::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MigratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_columns, 300);
        assert_eq!(config.max_varchar_bytes, 65535);
        assert_eq!(config.max_identifier_len, 127);
        assert_eq!(config.identifier_policy, IdentifierPolicy::Permissive);
    }

    #[test]
    fn test_config_rejects_zero_columns() {
        let config = MigratorConfig {
            max_columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScoopError::Config(ConfigError::InvalidValue { field, .. })) if field == "max_columns"
        ));
    }

    #[test]
    fn test_config_rejects_empty_transformers() {
        let config = MigratorConfig {
            transformers: TransformerSet::from_iter(Vec::<String>::new()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScoopError::Config(ConfigError::InvalidValue { field, .. })) if field == "transformers"
        ));
    }

    #[test]
    fn test_from_toml_partial_document_keeps_defaults() {
        let config = MigratorConfig::from_toml_str(
            r#"
            max_columns = 50
            identifier_policy = "strict"
            "#,
        )
        .expect("parse config");
        assert_eq!(config.max_columns, 50);
        assert_eq!(config.identifier_policy, IdentifierPolicy::Strict);
        assert_eq!(config.max_varchar_bytes, DEFAULT_MAX_VARCHAR_BYTES);
        assert_eq!(config.transformers, TransformerSet::standard());
    }

    #[test]
    fn test_from_toml_custom_transformers() {
        let config = MigratorConfig::from_toml_str(r#"transformers = ["int", "varchar"]"#)
            .expect("parse config");
        assert!(config.transformers.contains("int"));
        assert!(!config.transformers.contains("bigint"));
    }

    #[test]
    fn test_from_toml_rejects_bad_syntax() {
        let result = MigratorConfig::from_toml_str("max_columns = ");
        assert!(matches!(
            result,
            Err(ScoopError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn test_from_toml_validates() {
        let result = MigratorConfig::from_toml_str("max_identifier_len = 0");
        assert!(matches!(
            result,
            Err(ScoopError::Config(ConfigError::InvalidValue { field, .. })) if field == "max_identifier_len"
        ));
    }

    #[test]
    fn test_from_env_reads_overrides() {
        std::env::set_var("SCOOP_MAX_VARCHAR_BYTES", "1024");
        let config = MigratorConfig::from_env();
        std::env::remove_var("SCOOP_MAX_VARCHAR_BYTES");
        assert_eq!(config.max_varchar_bytes, 1024);
        assert_eq!(config.max_columns, DEFAULT_MAX_COLUMNS);
    }

    #[test]
    fn test_is_valid_identifier_uses_configured_limit() {
        let config = MigratorConfig {
            max_identifier_len: 4,
            ..Default::default()
        };
        assert!(config.is_valid_identifier("abcd"));
        assert!(!config.is_valid_identifier("abcde"));
    }
}
