//! Server configuration.
//!
//! Read once at start-up from the JSON file named by `ANNOTATOR_CONFIG`
//! (`annotator.json` by default). The file holds the server settings and the
//! tool configuration side by side:
//!
//! ```json
//! {
//!   "port": 8080,
//!   "dataDir": "data",
//!   "filesToSearch": [
//!     { "origin": "SRD", "category": "Condition", "path": "conditions.json",
//!       "propertiesToSearch": ["index", "name"] }
//!   ]
//! }
//! ```
//!
//! A missing file is not an error: the server starts with defaults and no
//! sources. A file that cannot be parsed or validated aborts start-up.

use common::model::datasource::ToolConfig;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "ANNOTATOR_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "annotator.json";

/// URL prefix under which datasets are served.
pub const DATA_URL_PREFIX: &str = "/data";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_open_browser() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory the dataset paths are relative to.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
    #[serde(flatten)]
    pub tool: ToolConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            open_browser: default_open_browser(),
            tool: ToolConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the file named by `ANNOTATOR_CONFIG`, or `annotator.json`.
    pub fn load() -> Result<Self, String> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            info!("No configuration at {}, starting without sources", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = serde_json::from_str(&text)
            .map_err(|e| format!("Invalid configuration in {}: {}", path.display(), e))?;
        config
            .tool
            .validate()
            .map_err(|e| format!("Invalid configuration in {}: {}", path.display(), e))?;

        info!(
            "Loaded {} data sources from {}",
            config.tool.files_to_search.len(),
            path.display()
        );
        Ok(config)
    }

    /// The tool configuration as the browser sees it: every dataset path
    /// points at the URL the server publishes it under.
    pub fn published_tool_config(&self) -> ToolConfig {
        let mut tool = self.tool.clone();
        for source in &mut tool.files_to_search {
            source.path = format!(
                "{}/{}",
                DATA_URL_PREFIX,
                source.path.trim_start_matches('/')
            );
        }
        tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert!(!config.tool.has_sources());
    }

    #[test]
    fn test_file_with_sources_and_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("annotator.json");
        fs::write(
            &path,
            r##"{
                "port": 9000,
                "openBrowser": false,
                "filesToSearch": [
                    {"origin": "SRD", "category": "Condition", "path": "conditions.json",
                     "propertiesToSearch": ["index", "name"], "colorDot": "#e53935"}
                ]
            }"##,
        )
        .unwrap();

        let config = ServerConfig::load_from(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.open_browser);
        assert_eq!(config.tool.files_to_search[0].color_dot.as_deref(), Some("#e53935"));
    }

    #[test]
    fn test_invalid_source_aborts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("annotator.json");
        fs::write(
            &path,
            r#"{"filesToSearch": [{"origin": "SRD", "category": "Condition",
                "path": "conditions.json", "propertiesToSearch": []}]}"#,
        )
        .unwrap();

        let err = ServerConfig::load_from(&path).unwrap_err();
        assert!(err.contains("propertiesToSearch must not be empty"), "{err}");
    }

    #[test]
    fn test_published_paths_point_at_data_urls() {
        let mut config = ServerConfig::default();
        config.tool = ToolConfig::from_json(
            r#"{"filesToSearch": [
                {"origin": "SRD", "category": "Condition", "path": "conditions.json", "propertiesToSearch": ["name"]},
                {"origin": "SRD", "category": "Spell", "path": "/srd/spells.json", "propertiesToSearch": ["name"]}
            ]}"#,
        )
        .unwrap();

        let paths: Vec<_> = config
            .published_tool_config()
            .files_to_search
            .into_iter()
            .map(|source| source.path)
            .collect();
        assert_eq!(paths, vec!["/data/conditions.json", "/data/srd/spells.json"]);
        assert_eq!(config.tool.files_to_search[0].path, "conditions.json");
    }
}
