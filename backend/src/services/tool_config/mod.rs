//! # Tool Configuration Service
//!
//! Publishes the annotation tool configuration the frontend starts with.
//! Dataset paths are rewritten to the URLs served by the `datasets` service,
//! so the browser can fetch every source directly.

mod get;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/config";

/// Configures and returns the Actix `Scope` for the configuration route.
///
/// # Registered Routes:
///
/// *   **`GET /api/config`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns the `ToolConfig` as camelCase JSON
///       (`{"filesToSearch": [...]}`), with every `path` pointing at `/data/...`.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(get::process))
}
