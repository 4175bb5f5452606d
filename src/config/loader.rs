//! Configuration file loading.
//!
//! The registry itself never reads configuration at render time; the host
//! application loads an [`AssetConfig`] once at startup and hands it to the
//! registry constructor.

use crate::config::schema::AssetConfig;
use crate::error::{AssetIncludeError, Result};
use std::fs;
use std::path::Path;

/// Load a config file and parse it into [`AssetConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<AssetConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AssetIncludeError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AssetIncludeError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`AssetConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<AssetConfig> {
    serde_yaml::from_str(content).map_err(|e| AssetIncludeError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AppEnv;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_file_parses_valid_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("assets.yml");
        fs::write(&config_path, "cdn: false\nsource: dist").unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(!config.cdn);
        assert_eq!(config.source, "dist");
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/assets.yml"));
        assert!(matches!(
            result,
            Err(AssetIncludeError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let content = "invalid: yaml: content: [";
        let result = parse_config(content, Path::new("assets.yml"));
        assert!(matches!(result, Err(AssetIncludeError::ConfigParse { .. })));
    }

    #[test]
    fn load_config_file_handles_empty_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("assets.yml");
        fs::write(&config_path, "").unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(config.cdn);
        assert_eq!(config.env, AppEnv::Production);
    }

    #[test]
    fn load_config_file_parses_full_config() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("assets.yml");
        fs::write(
            &config_path,
            r#"
http2: false
cdn: false
inline: true
source: dist
env: local
packages:
  jquery: [vendor.jquery, "3.7.1"]
"#,
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(!config.http2);
        assert!(!config.cdn);
        assert!(config.inline);
        assert_eq!(config.source, "dist");
        assert!(config.env.is_local());
        assert!(config.packages.contains_key("jquery"));
    }
}
