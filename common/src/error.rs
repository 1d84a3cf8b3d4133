//! Error taxonomy shared by the annotation core.
//!
//! None of these errors are meant to reach the host editor as faults. The
//! toolbar converts them into [`Notice`] values (or swallows them, for
//! `NoActiveSelection`) at its boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the annotation operations themselves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorError {
    /// The host has no live range. Never surfaced to the user.
    #[error("no active selection")]
    NoActiveSelection,

    /// Enter was pressed with nothing highlighted and the typed text does not
    /// name the first candidate.
    #[error("typed text does not match the first candidate")]
    InvalidSelection,

    /// The range to wrap intersects an existing annotation element.
    #[error("annotations cannot be nested")]
    NestedAnnotation,

    /// The element to unwrap is no longer part of the document.
    #[error("annotation element is detached from the document")]
    DetachedAnnotationElement,

    /// The element to unwrap does not carry the annotation tag and class.
    #[error("element is not an annotation")]
    NotAnAnnotation,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Per-source failures of a search. Each one only empties its own source.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceError {
    #[error("fetching `{path}` failed: {reason}")]
    FetchFailed { path: String, reason: String },

    #[error("`{path}` did not contain a JSON array")]
    InvalidServerData { path: String },
}

/// Configuration rejected at load time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(String),

    #[error("source #{index}: path must not be empty")]
    EmptyPath { index: usize },

    #[error("source #{index}: propertiesToSearch must not be empty")]
    NoSearchProperties { index: usize },

    #[error("source #{index}: propertiesToSearch contains a blank field name")]
    BlankSearchProperty { index: usize },

    #[error("source #{index}: propertiesToSearch lists `{field}` twice")]
    DuplicateSearchProperty { index: usize, field: String },

    #[error("source #{index}: `{mapping}` must name a record field")]
    BlankMapping { index: usize, mapping: &'static str },

    #[error("source #{index}: unsupported fontStyle `{value}`")]
    UnsupportedFontStyle { index: usize, value: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Visual style of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStyle {
    Error,
}

/// A message for the host's single user-notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub style: NoticeStyle,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            style: NoticeStyle::Error,
        }
    }
}
