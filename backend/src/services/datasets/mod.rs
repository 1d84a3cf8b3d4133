//! # Dataset Service
//!
//! Serves the reference datasets named in the configuration. The browser
//! fetches each source from here when it runs a search.

mod get;

use actix_web::web::{get, scope};
use actix_web::Scope;

use crate::config::DATA_URL_PREFIX;

/// Configures and returns the Actix `Scope` for dataset routes.
///
/// # Registered Routes:
///
/// *   **`GET /data/{path}`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns the JSON content of the dataset at `path`,
///       relative to the configured data directory. Paths escaping that
///       directory are refused with `400 Bad Request`, unknown files give
///       `404 Not Found`.
pub fn configure_routes() -> Scope {
    scope(DATA_URL_PREFIX).route("/{path:.*}", get().to(get::process))
}
