use serde_json::{Map, Value};

/// A raw entry of a reference dataset.
///
/// The shape is defined by the dataset; the core only reads the fields named
/// by a [`DataSourceConfig`](crate::model::datasource::DataSourceConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    fields: Map<String, Value>,
}

impl SearchRecord {
    /// Wraps a JSON value. Only objects are records; anything else is skipped
    /// by the search.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Text of a field, or `None` when the field is missing or blank.
    ///
    /// Strings are used as-is, numbers and booleans are printed, and arrays
    /// contribute their first element (datasets store descriptions as lists of
    /// paragraphs).
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(value_text)
    }
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => return items.first().and_then(value_text),
        Value::Null | Value::Object(_) => return None,
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
