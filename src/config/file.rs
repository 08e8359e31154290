//! Configuration file management
//!
//! Handles finding and loading configuration files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::HarnessConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./paygate-harness.yaml",
    "./paygate-harness.yml",
    "./paygate-harness.json",
    "./.paygate-harness.yaml",
];

/// Find configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

impl HarnessConfig {
    /// Load configuration from file, YAML or JSON by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_partial_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("harness.yaml");
        std::fs::write(
            &path,
            "grpc:\n  host: localhost\n  port: 50051\n  plaintext: true\npolling:\n  deadline_ms: 3000\n",
        )
        .unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.grpc.address(), "localhost:50051");
        assert!(config.grpc.plaintext);
        assert_eq!(config.polling.deadline_ms, 3000);
        assert_eq!(config.polling.interval_ms, 1000);
        assert_eq!(config.http.port, 10090);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("harness.json");
        std::fs::write(
            &path,
            r#"{"http": {"host": "api.test", "port": 8080}, "call_timeout_secs": 5}"#,
        )
        .unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.http.base_url(), "http://api.test:8080/api/");
        assert_eq!(config.call_timeout_secs, 5);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("harness.yaml");
        std::fs::write(&path, "polling:\n  page_size: 0\n").unwrap();
        assert!(HarnessConfig::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = HarnessConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
