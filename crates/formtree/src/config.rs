//! Tree configuration.
//!
//! ```toml
//! max_path_length = 512
//! max_array_index = 10000
//! shape_conflict = "replace"   # or "error"
//! ```

use formtree_path::{PathLimits, DEFAULT_MAX_ARRAY_INDEX, DEFAULT_MAX_PATH_LENGTH};
use serde::Deserialize;

use crate::error::{Result, TreeError};
use crate::navigate::{ShapeConflictPolicy, WriteMode, WriteOptions};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Longest path expression accepted, in bytes.
    pub max_path_length: usize,
    /// Largest array index accepted in a path.
    pub max_array_index: usize,
    pub shape_conflict: ShapeConflictPolicy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            max_array_index: DEFAULT_MAX_ARRAY_INDEX,
            shape_conflict: ShapeConflictPolicy::default(),
        }
    }
}

impl TreeConfig {
    /// Parse a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TreeConfig = match toml::from_str(content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse tree config: {}", err);
                return Err(TreeError::Config(err.to_string()));
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_path_length == 0 {
            return Err(TreeError::Config(
                "max_path_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn limits(&self) -> PathLimits {
        PathLimits {
            max_path_length: self.max_path_length,
            max_array_index: self.max_array_index,
        }
    }

    pub fn write_options(&self, mode: WriteMode) -> WriteOptions {
        WriteOptions {
            mode,
            shape_conflict: self.shape_conflict,
            limits: self.limits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TreeConfig::from_toml_str("").unwrap();
        assert_eq!(config, TreeConfig::default());
        assert_eq!(config.limits(), PathLimits::default());
    }

    #[test]
    fn parse_full_config() {
        let config = TreeConfig::from_toml_str(
            r#"
max_path_length = 1024
max_array_index = 50
shape_conflict = "error"
"#,
        )
        .unwrap();
        assert_eq!(config.max_path_length, 1024);
        assert_eq!(config.max_array_index, 50);
        assert_eq!(config.shape_conflict, ShapeConflictPolicy::Error);

        let options = config.write_options(WriteMode::Replace);
        assert_eq!(options.mode, WriteMode::Replace);
        assert_eq!(options.limits.max_array_index, 50);
    }

    #[test]
    fn parse_invalid_config() {
        assert!(matches!(
            TreeConfig::from_toml_str("shape_conflict = \"ignore\""),
            Err(TreeError::Config(_))
        ));
        assert!(matches!(
            TreeConfig::from_toml_str("unknown = 1"),
            Err(TreeError::Config(_))
        ));
        assert!(matches!(
            TreeConfig::from_toml_str("max_path_length = 0"),
            Err(TreeError::Config(_))
        ));
    }
}
