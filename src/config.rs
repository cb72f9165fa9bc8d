use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AudioError, Result};

/// Engine settings, loadable from a JSON file
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Buckets in waveform envelopes when the caller doesn't ask for a count
    pub waveform_buckets: usize,

    /// Placed between the source stem and the operation in export names
    pub output_suffix_separator: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            waveform_buckets: 100,
            output_suffix_separator: "_".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AudioError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AudioError::FileOpen {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.waveform_buckets == 0 {
            return Err(AudioError::Config(
                "waveform_buckets must be greater than 0".to_string(),
            ));
        }

        if self
            .output_suffix_separator
            .chars()
            .any(|c| std::path::is_separator(c) || c.is_control())
        {
            return Err(AudioError::Config(format!(
                "output_suffix_separator may not contain path separators: {:?}",
                self.output_suffix_separator
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.waveform_buckets, 100);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(r#"{ "waveform_buckets": 200 }"#).unwrap();
        assert_eq!(config.waveform_buckets, 200);
        assert_eq!(config.output_suffix_separator, "_");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "waveform_buckets": 0 }"#),
            Err(AudioError::Config(_))
        ));
        assert!(EngineConfig::from_json(r#"{ "output_suffix_separator": "/" }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "bucket_count": 10 }"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("wavesmith_test_config.json");
        std::fs::write(&path, r#"{ "output_suffix_separator": "-" }"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.output_suffix_separator, "-");

        std::fs::remove_file(path).ok();
    }
}
