//! HTTP access of the editor: the tool configuration and the datasets.

use gloo_net::http::Request;
use serde_json::Value;

use common::error::SourceError;
use common::model::datasource::ToolConfig;

pub async fn load_tool_config(url: &str) -> Result<ToolConfig, String> {
    let response = Request::get(url).send().await.map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("{} {}", response.status(), response.status_text()));
    }
    let config = response
        .json::<ToolConfig>()
        .await
        .map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Downloads one dataset. Transport failures, error statuses and bodies that
/// are not JSON all count as a failed fetch of `path`.
pub async fn fetch_dataset(path: String) -> Result<Value, SourceError> {
    let failed = |reason: String| SourceError::FetchFailed {
        path: path.clone(),
        reason,
    };

    let response = Request::get(&path)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;
    if !response.ok() {
        return Err(failed(format!(
            "{} {}",
            response.status(),
            response.status_text()
        )));
    }
    response.json::<Value>().await.map_err(|e| failed(e.to_string()))
}
