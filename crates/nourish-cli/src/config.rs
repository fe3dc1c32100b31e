//! Configuration loading for the CLI.

use crate::error::{CliError, Result};
use nourish_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Load the engine configuration, falling back to defaults when no file is given.
///
/// A file that exists but fails to parse or validate is an error; it never
/// silently degrades to the defaults.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let contents = fs::read_to_string(path)?;
    let config = EngineConfig::from_toml(&contents)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
    config
        .validate()
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = load_engine_config(None).unwrap();
        assert_eq!(config.strong_threshold, EngineConfig::default().strong_threshold);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "strong_threshold = 0.8\n\n[reset]\ndecay_after_secs = 600\ndecay_factor = 0.25\nclear_after_secs = 21600"
        )
        .unwrap();

        let config = load_engine_config(Some(file.path())).unwrap();
        assert_eq!(config.strong_threshold, 0.8);
        assert_eq!(config.reset.decay_after_secs, 600);
        assert_eq!(config.moderate_threshold, EngineConfig::default().moderate_threshold);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "strong_threshold = 0.2\nmoderate_threshold = 0.5").unwrap();

        let result = load_engine_config(Some(file.path()));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
