//! Editable page content.
//!
//! Every page is made of named sections. A section's effective content is
//! its defaults shallow-merged with the overrides an admin saved: per
//! top-level key the override wins, and list fields are replaced wholesale,
//! never merged item by item.
//!
//! # Modules
//!
//! - [`section`] - The closed set of section ids
//! - [`schema`] - Field and list shapes used to render the editor
//! - [`defaults`] - Hardcoded defaults and page-value layering
//! - [`about`] - The about page composite document
//! - [`draft`] - In-memory editing state of one section
//! - [`bundle`] - All sections of the site, resolved

pub mod about;
pub mod bundle;
pub mod defaults;
pub mod draft;
pub mod schema;
pub mod section;

pub use about::AboutDocument;
pub use bundle::{ContentBundle, PageSources};
pub use draft::{DraftError, DraftItem, ListTarget, SectionDraft};
pub use schema::{FieldKind, FieldSpec, ListItemKind, ListSpec, SectionSchema};
pub use section::{SectionId, UnknownSection};

use serde_json::{Map, Value};

/// Content of one section: a JSON object keyed by field name.
pub type SectionContent = Map<String, Value>;

/// Merge saved overrides over defaults.
///
/// ```
/// use reshow_core::content::{SectionContent, merge};
/// use serde_json::json;
///
/// let defaults: SectionContent = serde_json::from_value(json!({"title": "A", "items": [1, 2]})).unwrap();
/// let overrides: SectionContent = serde_json::from_value(json!({"items": [3]})).unwrap();
/// let merged = merge(&defaults, &overrides);
/// assert_eq!(merged["title"], json!("A"));
/// assert_eq!(merged["items"], json!([3]));
/// ```
#[must_use]
pub fn merge(defaults: &SectionContent, overrides: &SectionContent) -> SectionContent {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Interpret a JSON value as section content; anything but an object is empty.
#[must_use]
pub fn as_content(value: Option<&Value>) -> SectionContent {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => SectionContent::new(),
    }
}

/// Read a scalar field as text.
///
/// Numbers and booleans are rendered as text; missing or null values are `""`.
#[must_use]
pub fn text_of(content: &SectionContent, key: &str) -> String {
    value_text(content.get(key))
}

/// Render a scalar JSON value as text.
#[must_use]
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read a list field, treating anything but an array as empty.
#[must_use]
pub fn list_of<'a>(content: &'a SectionContent, key: &str) -> &'a [Value] {
    content
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}
