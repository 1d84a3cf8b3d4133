use crate::model::annotation::AnnotationMetadata;
use crate::model::datasource::DataSourceConfig;
use crate::model::record::SearchRecord;
use serde::{Deserialize, Serialize};

/// A matched record, tagged with the source it came from.
///
/// Built fresh for every search and dropped with the next render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    /// Never empty: falls back to the key, then to the matched value.
    pub display_name: String,
    pub display_description: Option<String>,
    /// Canonical index key used by exact-match commits.
    pub record_key: String,
    pub category: String,
    pub origin: String,
    pub color_dot: Option<String>,
    pub text_color: Option<String>,
    pub font_style: Option<String>,
    pub source_path: String,
}

impl CandidateItem {
    /// `matched` is the non-empty field value that satisfied the query.
    pub fn from_record(source: &DataSourceConfig, record: &SearchRecord, matched: String) -> Self {
        let key = record.text(&source.key_field);
        let name = record.text(&source.name_field);

        let display_name = name
            .or_else(|| key.clone())
            .unwrap_or_else(|| matched.clone());
        let record_key = key.unwrap_or_else(|| display_name.clone());

        Self {
            display_name,
            display_description: record.text(&source.description_field),
            record_key,
            category: source.category.clone(),
            origin: source.origin.clone(),
            color_dot: source.color_dot.clone(),
            text_color: source.text_color.clone(),
            font_style: source.font_style.clone(),
            source_path: source.path.clone(),
        }
    }

    pub fn to_metadata(&self) -> AnnotationMetadata {
        AnnotationMetadata {
            name: self.display_name.clone(),
            description: self.display_description.clone(),
            category: Some(self.category.clone()),
            origin: Some(self.origin.clone()),
            color_dot: self.color_dot.clone(),
            text_color: self.text_color.clone(),
            font_style: self.font_style.clone(),
            path: Some(self.source_path.clone()),
            record_key: Some(self.record_key.clone()),
        }
    }
}
