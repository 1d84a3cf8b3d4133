//! Persisted form of an annotation.
//!
//! An annotation lives in the document as an inline `<span>` carrying the
//! classes `annotation` and `annotation-<recordKey>`, a set of `data-*`
//! attributes and an inline `color` / `font-style`. Those names are part of
//! the saved document format and must not change.

use crate::document::Element;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

pub const ANNOTATION_TAG: &str = "span";
pub const ANNOTATION_CLASS: &str = "annotation";

pub const ATTR_NAME: &str = "data-name";
pub const ATTR_DESCRIPTION: &str = "data-description";
pub const ATTR_PATH: &str = "data-path";
pub const ATTR_CATEGORY: &str = "data-category";
pub const ATTR_ORIGIN: &str = "data-origin";
pub const ATTR_COLOR_DOT: &str = "data-color-dot";

pub const STYLE_COLOR: &str = "color";
pub const STYLE_FONT_STYLE: &str = "font-style";

/// Metadata stamped onto a committed annotation element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMetadata {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
    pub color_dot: Option<String>,
    pub text_color: Option<String>,
    pub font_style: Option<String>,
    /// Dataset the annotation was picked from.
    pub path: Option<String>,
    /// Canonical key of the record, encoded in the `annotation-<key>` class.
    pub record_key: Option<String>,
}

impl AnnotationMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds the (still childless) annotation element.
    pub fn to_element(&self) -> Element {
        let mut element = Element::new(ANNOTATION_TAG).with_class(ANNOTATION_CLASS);
        if let Some(key) = &self.record_key {
            element = element.with_class(&class_token(key));
        }

        element.set_attribute(ATTR_NAME, &self.name);
        for (attr, value) in [
            (ATTR_DESCRIPTION, &self.description),
            (ATTR_PATH, &self.path),
            (ATTR_CATEGORY, &self.category),
            (ATTR_ORIGIN, &self.origin),
            (ATTR_COLOR_DOT, &self.color_dot),
        ] {
            if let Some(value) = value {
                element.set_attribute(attr, value);
            }
        }
        if let Some(color) = &self.text_color {
            element.style.insert(STYLE_COLOR.to_string(), color.clone());
        }
        if let Some(font_style) = &self.font_style {
            element
                .style
                .insert(STYLE_FONT_STYLE.to_string(), font_style.clone());
        }

        element
    }

    /// Reads the metadata back from an annotation element. Returns `None` for
    /// elements that are not annotations.
    pub fn from_element(element: &Element) -> Option<Self> {
        if !is_annotation(element) {
            return None;
        }

        let attr = |name: &str| element.attribute(name).map(str::to_string);
        let record_key = element
            .classes
            .iter()
            .find_map(|class| class.strip_prefix("annotation-"))
            .map(str::to_string);

        Some(Self {
            name: attr(ATTR_NAME).unwrap_or_default(),
            description: attr(ATTR_DESCRIPTION),
            category: attr(ATTR_CATEGORY),
            origin: attr(ATTR_ORIGIN),
            color_dot: attr(ATTR_COLOR_DOT),
            text_color: element.style.get(STYLE_COLOR).cloned(),
            font_style: element.style.get(STYLE_FONT_STYLE).cloned(),
            path: attr(ATTR_PATH),
            record_key,
        })
    }
}

/// True for elements produced by [`AnnotationMetadata::to_element`].
pub fn is_annotation(element: &Element) -> bool {
    element.tag.eq_ignore_ascii_case(ANNOTATION_TAG) && element.has_class(ANNOTATION_CLASS)
}

/// Stable per-record class token: `annotation-` followed by the key, lowercased,
/// with every run of characters outside `[a-z0-9_-]` collapsed to `-`.
pub fn class_token(record_key: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID.get_or_init(|| Regex::new(r"[^a-z0-9_-]+").expect("static regex"));

    let key = record_key.trim().to_lowercase();
    format!("{}-{}", ANNOTATION_CLASS, invalid.replace_all(&key, "-"))
}

/// Whitelist of element tags and the attributes they may keep after
/// sanitization. `class` and `style` are listed like ordinary attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeRules {
    allowed: BTreeMap<String, BTreeSet<String>>,
}

impl SanitizeRules {
    pub fn allow(mut self, tag: &str, attributes: &[&str]) -> Self {
        self.allowed
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .extend(attributes.iter().map(|a| a.to_string()));
        self
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed.contains_key(&tag.to_ascii_lowercase())
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.allowed
            .get(&tag.to_ascii_lowercase())
            .is_some_and(|attrs| attrs.contains(attribute))
    }

    /// Rules that keep annotation elements intact.
    pub fn for_annotations() -> Self {
        Self::default().allow(
            ANNOTATION_TAG,
            &[
                "class",
                "style",
                ATTR_NAME,
                ATTR_DESCRIPTION,
                ATTR_PATH,
                ATTR_CATEGORY,
                ATTR_ORIGIN,
                ATTR_COLOR_DOT,
            ],
        )
    }
}
