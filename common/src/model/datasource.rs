use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const FONT_STYLES: [&str; 3] = ["normal", "italic", "oblique"];

fn default_key_field() -> String {
    "index".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

fn default_description_field() -> String {
    "desc".to_string()
}

/// One configured reference dataset.
///
/// Loaded once with the tool configuration and never mutated afterwards. The
/// `*_field` members are the explicit mapping from record fields to the
/// candidate/annotation attributes; they are checked by [`ToolConfig::validate`]
/// rather than at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConfig {
    /// Where the dataset comes from, e.g. `"SRD"`.
    pub origin: String,
    /// What kind of entries the dataset holds, e.g. `"Condition"`.
    pub category: String,
    /// Location of the JSON array of records.
    pub path: String,
    /// Ordered set of record fields compared against the query.
    pub properties_to_search: Vec<String>,
    /// Canonical index key of a record. Used for exact-match commits and the
    /// per-record class token.
    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default = "default_name_field")]
    pub name_field: String,
    #[serde(default = "default_description_field")]
    pub description_field: String,
    #[serde(default)]
    pub color_dot: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub font_style: Option<String>,
}

impl DataSourceConfig {
    /// Builds a source with default field mapping and no styling.
    pub fn new(
        origin: impl Into<String>,
        category: impl Into<String>,
        path: impl Into<String>,
        properties_to_search: &[&str],
    ) -> Self {
        Self {
            origin: origin.into(),
            category: category.into(),
            path: path.into(),
            properties_to_search: properties_to_search.iter().map(|p| p.to_string()).collect(),
            key_field: default_key_field(),
            name_field: default_name_field(),
            description_field: default_description_field(),
            color_dot: None,
            text_color: None,
            font_style: None,
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::EmptyPath { index });
        }
        if self.properties_to_search.is_empty() {
            return Err(ConfigError::NoSearchProperties { index });
        }

        let mut seen = HashSet::new();
        for field in &self.properties_to_search {
            if field.trim().is_empty() {
                return Err(ConfigError::BlankSearchProperty { index });
            }
            if !seen.insert(field.as_str()) {
                return Err(ConfigError::DuplicateSearchProperty {
                    index,
                    field: field.clone(),
                });
            }
        }

        for (mapping, value) in [
            ("keyField", &self.key_field),
            ("nameField", &self.name_field),
            ("descriptionField", &self.description_field),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::BlankMapping { index, mapping });
            }
        }

        if let Some(style) = &self.font_style {
            if !FONT_STYLES.contains(&style.as_str()) {
                return Err(ConfigError::UnsupportedFontStyle {
                    index,
                    value: style.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Construction-time configuration of the annotation tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    #[serde(default)]
    pub files_to_search: Vec<DataSourceConfig>,
}

impl ToolConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ToolConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.files_to_search
            .iter()
            .enumerate()
            .try_for_each(|(index, source)| source.validate(index))
    }

    pub fn has_sources(&self) -> bool {
        !self.files_to_search.is_empty()
    }
}
