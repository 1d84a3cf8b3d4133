use crate::error::SourceError;
use crate::model::candidate::CandidateItem;
use crate::search::QueryResults;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
/// Query string of the server-side search endpoint.
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
/// Response of the server-side search endpoint.
/// Candidates are flattened in source order; failed sources are listed in `errors`.
pub struct SearchResponse {
    pub candidates: Vec<CandidateItem>,
    pub errors: Vec<SourceError>,
}

impl From<QueryResults> for SearchResponse {
    fn from(results: QueryResults) -> Self {
        let errors = results.errors().into_iter().cloned().collect();
        let candidates = results.into_lists().into_iter().flatten().collect();
        Self { candidates, errors }
    }
}
