use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storymap_layout::{default_version_preference, ComposeOptions};
use storymap_schema::DEFAULT_VERSION;

pub const DEFAULT_CONFIG_NAME: &str = "storymap.config.json";

/// Story map configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory scanned by `validate` when no path is given
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Version label for stories that have none
    #[serde(default = "default_version")]
    pub default_version: String,

    /// Version band order for maps without `version_definitions`
    #[serde(default = "default_version_preference")]
    pub version_order: Vec<String>,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_src_dir() -> String {
    "examples".to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            default_version: self.default_version.clone(),
            version_preference: self.version_order.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            default_version: default_version(),
            version_order: default_version_preference(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "srcDir": "maps",
            "defaultVersion": "Backlog",
            "versionOrder": ["Backlog", "Now", "Later"],
            "logLevel": "debug"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.src_dir, "maps");
        assert_eq!(config.default_version, "Backlog");
        assert_eq!(config.version_order, vec!["Backlog", "Now", "Later"]);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "srcDir": "maps" }"#).unwrap();
        assert_eq!(config.src_dir, "maps");
        assert_eq!(config.default_version, "MVP");
        assert_eq!(config.version_order[0], "MVP");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.src_dir, "examples");
        assert_eq!(
            config.version_order,
            vec!["MVP", "Release1", "Release2", "v1.0", "v2.0", "Future"]
        );
        assert_eq!(config.compose_options(), ComposeOptions::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_string_lossy().to_string();

        assert_eq!(Config::load(&cwd).unwrap(), Config::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "defaultVersion": "Later" }"#,
        )
        .unwrap();
        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.default_version, "Later");
        assert_eq!(config.get_src_dir(&cwd), dir.path().join("examples"));
    }
}
