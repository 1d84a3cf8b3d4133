//! User-facing messages. Each constant is both the English text and the key
//! handed to [`ToolHost::translate`](super::ToolHost::translate).

pub const TITLE: &str = "Annotation";
pub const SEARCH_PLACEHOLDER: &str = "Search an annotation";
pub const NO_SOURCES_AVAILABLE: &str = "There are no sources available...";
pub const SEARCH_REQUEST_ERROR: &str = "Cannot process search request because of";
pub const INVALID_SERVER_DATA: &str = "Server responded with invalid data";
pub const INVALID_ANNOTATION_NAME: &str = "Incorrect annotation name";
pub const NESTED_ANNOTATION: &str = "Annotations cannot be nested";
pub const DETACHED_ANNOTATION: &str = "The annotation is no longer part of the document";
pub const NOT_AN_ANNOTATION: &str = "The selected element is not an annotation";
