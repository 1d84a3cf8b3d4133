//! Prefix search over the configured reference datasets.
//!
//! The index does not know how a dataset is obtained: callers pass a fetcher
//! (an HTTP request in the browser, a cached file read on the server). Every
//! source is fetched and matched on its own, so one failing source only
//! empties its own slot.

use crate::error::SourceError;
use crate::model::candidate::CandidateItem;
use crate::model::datasource::{DataSourceConfig, ToolConfig};
use crate::model::record::SearchRecord;
use futures_util::future::join_all;
use log::debug;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

pub mod sequencer;

/// Outcome of one source for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResult {
    pub origin: String,
    pub outcome: Result<Vec<CandidateItem>, SourceError>,
}

/// Per-source results, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResults {
    pub sources: Vec<SourceResult>,
}

impl QueryResults {
    /// All matches, flattened in display order.
    pub fn candidates(&self) -> Vec<&CandidateItem> {
        self.sources
            .iter()
            .filter_map(|source| source.outcome.as_ref().ok())
            .flatten()
            .collect()
    }

    pub fn errors(&self) -> Vec<&SourceError> {
        self.sources
            .iter()
            .filter_map(|source| source.outcome.as_ref().err())
            .collect()
    }

    /// One list per source; failed sources contribute an empty list.
    pub fn into_lists(self) -> Vec<Vec<CandidateItem>> {
        self.sources
            .into_iter()
            .map(|source| source.outcome.unwrap_or_default())
            .collect()
    }
}

/// The configured sources, shared cheaply between concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    sources: Arc<Vec<DataSourceConfig>>,
}

impl SearchIndex {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            sources: Arc::new(config.files_to_search.clone()),
        }
    }

    pub fn sources(&self) -> &[DataSourceConfig] {
        &self.sources
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Runs `text` against every source.
    ///
    /// `fetch` is called once per source and the fetches run concurrently.
    /// With no sources configured nothing is fetched.
    pub async fn query<F, Fut>(&self, text: &str, fetch: F) -> QueryResults
    where
        F: Fn(&DataSourceConfig) -> Fut,
        Fut: Future<Output = Result<Value, SourceError>>,
    {
        if self.sources.is_empty() {
            return QueryResults::default();
        }

        let fetch = &fetch;
        let pending = self.sources.iter().map(|source| async move {
            let outcome = match fetch(source).await {
                Ok(payload) => match_payload(source, payload, text),
                Err(err) => Err(err),
            };
            SourceResult {
                origin: source.origin.clone(),
                outcome,
            }
        });

        let results = QueryResults {
            sources: join_all(pending).await,
        };
        debug!(
            "query {:?}: {} candidates, {} failed sources",
            text,
            results.candidates().len(),
            results.errors().len()
        );
        results
    }
}

/// Matches one source's payload. The payload must be a JSON array; entries
/// that are not objects are skipped.
pub fn match_payload(
    source: &DataSourceConfig,
    payload: Value,
    text: &str,
) -> Result<Vec<CandidateItem>, SourceError> {
    let Value::Array(entries) = payload else {
        return Err(SourceError::InvalidServerData {
            path: source.path.clone(),
        });
    };

    let needle = text.to_lowercase();
    Ok(entries
        .into_iter()
        .filter_map(SearchRecord::from_value)
        .filter_map(|record| {
            let matched = source
                .properties_to_search
                .iter()
                .filter_map(|field| record.text(field))
                .find(|value| value.to_lowercase().starts_with(&needle))?;
            Some(CandidateItem::from_record(source, &record, matched))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::future::ready;
    use std::time::Duration;

    fn conditions() -> DataSourceConfig {
        DataSourceConfig::new("SRD", "Condition", "conditions.json", &["index", "name"])
    }

    fn spells() -> DataSourceConfig {
        DataSourceConfig::new("SRD", "Spell", "spells.json", &["name"])
    }

    fn index(sources: Vec<DataSourceConfig>) -> SearchIndex {
        SearchIndex::new(&ToolConfig {
            files_to_search: sources,
        })
    }

    fn payload_for(source: &DataSourceConfig) -> Result<Value, SourceError> {
        match source.path.as_str() {
            "conditions.json" => Ok(json!([
                {"index": "blinded", "name": "Blinded"},
                {"index": "charmed", "name": "Charmed"},
                {"index": "deafened", "name": "Deafened"}
            ])),
            "spells.json" => Ok(json!([
                {"index": "bless", "name": "Bless"},
                {"index": "blight", "name": "Blight"}
            ])),
            path => Err(SourceError::FetchFailed {
                path: path.to_string(),
                reason: "404 Not Found".into(),
            }),
        }
    }

    #[tokio::test]
    async fn test_prefix_match_on_single_source() {
        let results = index(vec![conditions()])
            .query("bli", |source| ready(payload_for(source)))
            .await;

        let candidates = results.candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name, "Blinded");
        assert_eq!(candidates[0].origin, "SRD");
        assert_eq!(candidates[0].category, "Condition");
        assert!(results.errors().is_empty());
    }

    #[tokio::test]
    async fn test_no_match_is_empty_without_errors() {
        let results = index(vec![conditions()])
            .query("zzz", |source| ready(payload_for(source)))
            .await;
        assert!(results.candidates().is_empty());
        assert!(results.errors().is_empty());
        assert_eq!(results.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive_on_any_field() {
        let results = index(vec![conditions()])
            .query("CHAR", |source| ready(payload_for(source)))
            .await;
        assert_eq!(results.candidates()[0].record_key, "charmed");
    }

    #[tokio::test]
    async fn test_first_result_starts_with_query() {
        let search = index(vec![conditions(), spells()]);
        for query in ["b", "Bl", "bli", "BLE", "c", "de"] {
            let results = search.query(query, |source| ready(payload_for(source))).await;
            let first = results.candidates()[0];
            let needle = query.to_lowercase();
            assert!(
                first.display_name.to_lowercase().starts_with(&needle)
                    || first.record_key.to_lowercase().starts_with(&needle),
                "{query} -> {first:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_sources_keep_configuration_order() {
        // The first source answers last.
        let search = index(vec![spells(), conditions()]);
        let results = search
            .query("bl", |source| {
                let delay = if source.path == "spells.json" { 30 } else { 0 };
                let payload = payload_for(source);
                async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    payload
                }
            })
            .await;

        let lists = results.into_lists();
        assert_eq!(lists.len(), 2);
        let names: Vec<_> = lists[0].iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Bless", "Blight"]);
        assert_eq!(lists[1][0].display_name, "Blinded");
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_others() {
        let missing = DataSourceConfig::new("Homebrew", "Item", "missing.json", &["name"]);
        let results = index(vec![missing, conditions()])
            .query("bli", |source| ready(payload_for(source)))
            .await;

        assert_eq!(
            results.errors(),
            vec![&SourceError::FetchFailed {
                path: "missing.json".into(),
                reason: "404 Not Found".into()
            }]
        );
        let lists = results.into_lists();
        assert!(lists[0].is_empty());
        assert_eq!(lists[1].len(), 1);
    }

    #[tokio::test]
    async fn test_non_array_payload_is_invalid_server_data() {
        let results = index(vec![conditions()])
            .query("bli", |_| ready(Ok(json!({"results": []}))))
            .await;
        assert_eq!(
            results.errors(),
            vec![&SourceError::InvalidServerData {
                path: "conditions.json".into()
            }]
        );
        assert!(results.candidates().is_empty());
    }

    #[tokio::test]
    async fn test_no_sources_never_fetches() {
        let calls = Cell::new(0);
        let results = SearchIndex::default()
            .query("bli", |source| {
                calls.set(calls.get() + 1);
                ready(payload_for(source))
            })
            .await;
        assert_eq!(results, QueryResults::default());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_blank_and_non_object_entries_never_match() {
        let payload = json!([
            "blinded",
            {"index": "", "name": null},
            {"index": "blinded"}
        ]);
        let found = match_payload(&conditions(), payload, "b").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name, "blinded");
    }
}
