//! In-memory editing state of one section.
//!
//! A draft is built from effective content (or from a submitted editor
//! form), edited field by field, and turned back into content on save.
//! Items added to object lists carry a pending id until then.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use super::{SectionContent, SectionId, SectionSchema, list_of, value_text};
use crate::types::{PendingId, PendingIdAllocator};

/// Editing failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{section} has no field named {field}")]
    UnknownField { section: SectionId, field: String },
    #[error("{section} has no such list")]
    NoList { section: SectionId },
    #[error("item {index} does not exist")]
    NoSuchItem { index: usize },
    #[error("list items of {section} are not plain text")]
    NotStrings { section: SectionId },
}

/// Which collection of a section an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    /// The section's list field.
    Primary,
    /// The secondary `images` list of the experience section.
    Images,
}

impl ListTarget {
    /// Prefix of this list's inputs in the editor form.
    #[must_use]
    pub const fn form_prefix(self) -> &'static str {
        match self {
            Self::Primary => "l",
            Self::Images => "i",
        }
    }
}

/// One entry of a section list.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftItem {
    Text(String),
    Object {
        /// `None` for items that never had an id.
        id: Option<PendingId>,
        fields: SectionContent,
    },
}

impl DraftItem {
    /// Text of a field of an object item (or the text of a string item).
    #[must_use]
    pub fn field(&self, name: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Object { fields, .. } => value_text(fields.get(name)),
        }
    }

    /// The item's id as used in the editor form.
    #[must_use]
    pub fn form_id(&self) -> Option<String> {
        match self {
            Self::Object { id: Some(id), .. } => Some(id.to_string()),
            _ => None,
        }
    }

    fn from_value(value: &Value, strings: bool) -> Self {
        if strings {
            return Self::Text(value_text(Some(value)));
        }
        let mut fields = match value {
            Value::Object(map) => map.clone(),
            _ => SectionContent::new(),
        };
        let id = PendingId::from_json(fields.remove("id").as_ref());
        Self::Object { id, fields }
    }
}

/// Editable state of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDraft {
    id: SectionId,
    scalars: SectionContent,
    list: Vec<DraftItem>,
    images: Vec<DraftItem>,
}

impl SectionDraft {
    /// Start editing from effective content.
    #[must_use]
    pub fn from_content(id: SectionId, content: &SectionContent) -> Self {
        let schema = id.schema();
        let mut scalars = content.clone();
        let mut list = Vec::new();
        let mut images = Vec::new();

        if let Some(spec) = schema.list {
            list = list_of(content, spec.field)
                .iter()
                .map(|v| DraftItem::from_value(v, spec.is_strings()))
                .collect();
            scalars.remove(spec.field);
        }
        if let Some(spec) = schema.images {
            images = list_of(content, spec.field)
                .iter()
                .map(|v| DraftItem::from_value(v, spec.is_strings()))
                .collect();
            scalars.remove(spec.field);
        }

        Self {
            id,
            scalars,
            list,
            images,
        }
    }

    /// Rebuild a draft from submitted editor inputs.
    ///
    /// Input names: `f.<field>` for scalars, `l.<n>` / `l.<n>.<field>` /
    /// `l.<n>.id` for the primary list and `i.<n>.<field>` / `i.<n>.id` for
    /// the secondary images list. Unknown inputs are ignored.
    #[must_use]
    pub fn from_form<'a>(
        id: SectionId,
        inputs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let schema = id.schema();
        let mut scalars = SectionContent::new();
        let mut list: BTreeMap<usize, DraftItem> = BTreeMap::new();
        let mut images: BTreeMap<usize, DraftItem> = BTreeMap::new();

        for (name, value) in inputs {
            if let Some(field) = name.strip_prefix("f.") {
                if schema.field(field).is_some() {
                    scalars.insert(field.to_string(), Value::String(value.to_string()));
                }
            } else if let Some(rest) = name.strip_prefix("l.") {
                if let Some(spec) = schema.list {
                    collect_item(&mut list, rest, value, spec.is_strings());
                }
            } else if let Some(rest) = name.strip_prefix("i.") {
                if let Some(spec) = schema.images {
                    collect_item(&mut images, rest, value, spec.is_strings());
                }
            }
        }

        for field in schema.fields {
            scalars
                .entry(field.name)
                .or_insert_with(|| Value::String(String::new()));
        }

        Self {
            id,
            scalars,
            list: list.into_values().collect(),
            images: images.into_values().collect(),
        }
    }

    /// Section being edited.
    #[must_use]
    pub const fn id(&self) -> SectionId {
        self.id
    }

    /// Schema of the section being edited.
    #[must_use]
    pub fn schema(&self) -> &'static SectionSchema {
        self.id.schema()
    }

    /// Current text of a scalar field.
    #[must_use]
    pub fn scalar(&self, name: &str) -> String {
        value_text(self.scalars.get(name))
    }

    /// Items of a list.
    #[must_use]
    pub fn items(&self, target: ListTarget) -> &[DraftItem] {
        match target {
            ListTarget::Primary => &self.list,
            ListTarget::Images => &self.images,
        }
    }

    fn items_mut(&mut self, target: ListTarget) -> Result<&mut Vec<DraftItem>, DraftError> {
        let schema = self.id.schema();
        let exists = match target {
            ListTarget::Primary => schema.list.is_some(),
            ListTarget::Images => schema.images.is_some(),
        };
        if !exists {
            return Err(DraftError::NoList { section: self.id });
        }
        Ok(match target {
            ListTarget::Primary => &mut self.list,
            ListTarget::Images => &mut self.images,
        })
    }

    /// Set a scalar field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), DraftError> {
        if self.id.schema().field(name).is_none() {
            return Err(DraftError::UnknownField {
                section: self.id,
                field: name.to_string(),
            });
        }
        self.scalars
            .insert(name.to_string(), Value::String(value.into()));
        Ok(())
    }

    /// Append an empty item to a list.
    ///
    /// Object items get a fresh pending id and the list's new-item defaults.
    pub fn push_item(&mut self, target: ListTarget) -> Result<(), DraftError> {
        let schema = self.id.schema();
        let spec = match target {
            ListTarget::Primary => schema.list,
            ListTarget::Images => schema.images,
        }
        .ok_or(DraftError::NoList { section: self.id })?;

        let items = self.items_mut(target)?;
        if spec.is_strings() {
            items.push(DraftItem::Text(String::new()));
            return Ok(());
        }

        let mut allocator = PendingIdAllocator::after(items.iter().filter_map(|item| match item {
            DraftItem::Object { id: Some(id), .. } => Some(id),
            _ => None,
        }));
        let mut fields = SectionContent::new();
        for field in spec.item_fields() {
            fields.insert(field.name.to_string(), Value::String(String::new()));
        }
        for (name, value) in spec.new_item_defaults {
            fields.insert((*name).to_string(), Value::String((*value).to_string()));
        }
        items.push(DraftItem::Object {
            id: Some(allocator.allocate()),
            fields,
        });
        Ok(())
    }

    /// Remove the item at `index`, keeping the others in order.
    pub fn remove_item(&mut self, target: ListTarget, index: usize) -> Result<(), DraftError> {
        let items = self.items_mut(target)?;
        if index >= items.len() {
            return Err(DraftError::NoSuchItem { index });
        }
        items.remove(index);
        Ok(())
    }

    /// Set one field of an object item.
    pub fn set_item_field(
        &mut self,
        target: ListTarget,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let section = self.id;
        let items = self.items_mut(target)?;
        match items.get_mut(index) {
            Some(DraftItem::Object { fields, .. }) => {
                fields.insert(field.to_string(), Value::String(value.into()));
                Ok(())
            }
            Some(DraftItem::Text(_)) => Err(DraftError::UnknownField {
                section,
                field: field.to_string(),
            }),
            None => Err(DraftError::NoSuchItem { index }),
        }
    }

    /// Replace a string item.
    pub fn set_string_item(
        &mut self,
        target: ListTarget,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let section = self.id;
        let items = self.items_mut(target)?;
        match items.get_mut(index) {
            Some(DraftItem::Text(text)) => {
                *text = value.into();
                Ok(())
            }
            Some(DraftItem::Object { .. }) => Err(DraftError::NotStrings { section }),
            None => Err(DraftError::NoSuchItem { index }),
        }
    }

    /// Content to save. Pending ids are resolved to numbers above every
    /// persisted id of the same list.
    #[must_use]
    pub fn to_content(&self) -> SectionContent {
        let schema = self.id.schema();
        let mut content = self.scalars.clone();
        if let Some(spec) = schema.list {
            content.insert(spec.field.to_string(), items_to_json(&self.list));
        }
        if let Some(spec) = schema.images {
            content.insert(spec.field.to_string(), items_to_json(&self.images));
        }
        content
    }
}

fn collect_item(items: &mut BTreeMap<usize, DraftItem>, rest: &str, value: &str, strings: bool) {
    let (index, field) = match rest.split_once('.') {
        Some((index, field)) => (index, Some(field)),
        None => (rest, None),
    };
    let Ok(index) = index.parse::<usize>() else {
        return;
    };

    if strings {
        if field.is_none() {
            items.insert(index, DraftItem::Text(value.to_string()));
        }
        return;
    }

    let Some(field) = field else {
        return;
    };
    let entry = items.entry(index).or_insert_with(|| DraftItem::Object {
        id: None,
        fields: SectionContent::new(),
    });
    if let DraftItem::Object { id, fields } = entry {
        if field == "id" {
            *id = value.parse().ok();
        } else {
            fields.insert(field.to_string(), Value::String(value.to_string()));
        }
    }
}

fn items_to_json(items: &[DraftItem]) -> Value {
    let ids: Vec<PendingId> = items
        .iter()
        .filter_map(|item| match item {
            DraftItem::Object { id: Some(id), .. } => Some(*id),
            _ => None,
        })
        .collect();
    let mut resolved = PendingId::resolve(&ids).into_iter();

    Value::Array(
        items
            .iter()
            .map(|item| match item {
                DraftItem::Text(text) => Value::String(text.clone()),
                DraftItem::Object { id, fields } => {
                    let mut object = SectionContent::new();
                    if id.is_some() {
                        if let Some(n) = resolved.next() {
                            object.insert("id".to_string(), Value::from(n));
                        }
                    }
                    for (key, value) in fields {
                        object.insert(key.clone(), value.clone());
                    }
                    Value::Object(object)
                }
            })
            .collect(),
    )
}
