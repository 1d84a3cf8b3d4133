//! # Search Service
//!
//! Runs the annotation search on the server, over the cached datasets. It
//! answers the same question as the in-browser search, for clients that do
//! not want to fetch every dataset themselves.

mod query;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/search";

/// Configures and returns the Actix `Scope` for the search route.
///
/// # Registered Routes:
///
/// *   **`GET /api/search?q={text}`**:
///     - **Handler**: `query::process`
///     - **Description**: Matches `text` as a case-insensitive prefix against the
///       searchable fields of every configured source. Returns a `SearchResponse`
///       with the candidates in source order and one entry per failed source.
///       A blank query is refused with `400 Bad Request`.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(query::process))
}
