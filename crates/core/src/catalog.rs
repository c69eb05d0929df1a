//! Products, services and the categories they are filed under.
//!
//! The backend references a category by its name. The site works with
//! category ids instead and converts at the edges: names read from the
//! backend are resolved against the current category list when rendering,
//! and ids chosen in a form are turned back into names on submit.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::types::{CategoryId, ProductId, ServiceId};

/// Categories offered when the backend has none (or cannot be reached).
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Apparel", "Headwear", "Promotional Gifts", "PPE Wear"];

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Category name.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
}

/// A service offered on the services page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    #[serde(default)]
    pub title: String,
    /// Category name; services may be uncategorised.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
}

/// A product/service category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// How an item refers to its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRef {
    /// A category that exists.
    Known(CategoryId),
    /// A name with no matching category (renamed or deleted).
    Unresolved(String),
    /// No category.
    Unassigned,
}

impl CategoryRef {
    const ID_PREFIX: &'static str = "id:";
    const NAME_PREFIX: &'static str = "name:";

    /// Read a category selector value: `id:<n>` for a known category,
    /// `name:<s>` for a name kept as is.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        let value = value.trim();
        if let Some(id) = value.strip_prefix(Self::ID_PREFIX) {
            return id.trim().parse().map_or_else(
                |_| Self::Unresolved(value.to_string()),
                Self::Known,
            );
        }
        let name = value.strip_prefix(Self::NAME_PREFIX).unwrap_or(value).trim();
        if name.is_empty() {
            Self::Unassigned
        } else {
            Self::Unresolved(name.to_string())
        }
    }

    /// Selector value for this reference.
    #[must_use]
    pub fn form_value(&self) -> String {
        match self {
            Self::Known(id) => format!("{}{id}", Self::ID_PREFIX),
            Self::Unresolved(name) => format!("{}{name}", Self::NAME_PREFIX),
            Self::Unassigned => String::new(),
        }
    }
}

/// Lookup between category ids and names.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    names: BTreeMap<CategoryId, String>,
}

impl CategoryIndex {
    /// Index the given categories.
    #[must_use]
    pub fn new(categories: &[Category]) -> Self {
        Self {
            names: categories.iter().map(|c| (c.id, c.name.clone())).collect(),
        }
    }

    /// Resolve a category name as stored on an item.
    #[must_use]
    pub fn resolve(&self, name: &str) -> CategoryRef {
        let name = name.trim();
        if name.is_empty() {
            return CategoryRef::Unassigned;
        }
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map_or_else(
                || CategoryRef::Unresolved(name.to_string()),
                |(id, _)| CategoryRef::Known(*id),
            )
    }

    /// Name to send to the backend, `None` when unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogFormError::UnknownCategory`] when a chosen id is not
    /// in the index.
    pub fn wire_name(&self, category: &CategoryRef) -> Result<Option<String>, CatalogFormError> {
        match category {
            CategoryRef::Known(id) => self
                .names
                .get(id)
                .cloned()
                .map(Some)
                .ok_or(CatalogFormError::UnknownCategory),
            CategoryRef::Unresolved(name) => Ok(Some(name.clone())),
            CategoryRef::Unassigned => Ok(None),
        }
    }

    /// Name to display.
    #[must_use]
    pub fn display(&self, category: &CategoryRef) -> String {
        match category {
            CategoryRef::Known(id) => self.names.get(id).cloned().unwrap_or_default(),
            CategoryRef::Unresolved(name) => name.clone(),
            CategoryRef::Unassigned => "Uncategorised".to_string(),
        }
    }

    /// Whether any category is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Product or service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Product,
    Service,
}

impl CatalogKind {
    /// Name of the title field on the wire.
    #[must_use]
    pub const fn title_field(self) -> &'static str {
        match self {
            Self::Product => "name",
            Self::Service => "title",
        }
    }

    /// Singular noun for messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Service => "service",
        }
    }

    /// `uploadType` used for this kind's images.
    #[must_use]
    pub const fn upload_type(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Service => "content",
        }
    }

    /// Whether a category must be chosen.
    #[must_use]
    pub const fn requires_category(self) -> bool {
        matches!(self, Self::Product)
    }
}

/// Validation failure of a catalog form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogFormError {
    #[error("Name is required")]
    NameRequired,
    #[error("Title is required")]
    TitleRequired,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Category is required")]
    CategoryRequired,
    #[error("The selected category no longer exists. Please choose another.")]
    UnknownCategory,
    #[error("Rating must be between 0 and 5")]
    RatingOutOfRange,
}

/// Submitted create/update form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogForm {
    /// Product name or service title.
    #[serde(default)]
    pub title: String,
    /// Selector value (see [`CategoryRef::from_form`]).
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<String>,
}

impl CatalogForm {
    /// Prefill the form from a product.
    #[must_use]
    pub fn from_product(product: &Product, index: &CategoryIndex) -> Self {
        Self {
            title: product.name.clone(),
            category: index.resolve(&product.category).form_value(),
            description: product.description.clone(),
            image: product.image.clone(),
            rating: Some(product.rating.to_string()),
        }
    }

    /// Prefill the form from a service.
    #[must_use]
    pub fn from_service(service: &Service, index: &CategoryIndex) -> Self {
        Self {
            title: service.title.clone(),
            category: index.resolve(&service.category).form_value(),
            description: service.description.clone(),
            image: service.image.clone(),
            rating: Some(service.rating.to_string()),
        }
    }

    /// Validate and produce the request body.
    pub fn validate(
        &self,
        kind: CatalogKind,
        index: &CategoryIndex,
    ) -> Result<CatalogSubmission, CatalogFormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(match kind {
                CatalogKind::Product => CatalogFormError::NameRequired,
                CatalogKind::Service => CatalogFormError::TitleRequired,
            });
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(CatalogFormError::DescriptionRequired);
        }

        let category = index
            .wire_name(&CategoryRef::from_form(&self.category))?
            .unwrap_or_default();
        if kind.requires_category() && category.is_empty() {
            return Err(CatalogFormError::CategoryRequired);
        }

        let rating = match self.rating.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|r| (0.0..=5.0).contains(r))
                .ok_or(CatalogFormError::RatingOutOfRange)?,
        };

        Ok(CatalogSubmission {
            kind,
            title: title.to_string(),
            category,
            description: description.to_string(),
            image: self.image.trim().to_string(),
            rating,
        })
    }
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSubmission {
    pub kind: CatalogKind,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub rating: f64,
}

impl CatalogSubmission {
    /// JSON body for `POST`/`PUT`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "category": self.category,
            "description": self.description,
            "image": self.image,
            "rating": self.rating,
        });
        if let Value::Object(map) = &mut body {
            map.insert(
                self.kind.title_field().to_string(),
                Value::String(self.title.clone()),
            );
        }
        body
    }
}

/// Category names for the public filter bar: `all` first, then the backend's
/// categories, or the defaults when there are none.
#[must_use]
pub fn filter_categories(categories: &[Category]) -> Vec<String> {
    let mut names = vec!["all".to_string()];
    if categories.is_empty() {
        names.extend(DEFAULT_CATEGORIES.iter().map(ToString::to_string));
    } else {
        names.extend(categories.iter().map(|c| c.name.clone()));
    }
    names
}

/// Whether an item with `category` passes the public filter `selected`.
#[must_use]
pub fn matches_filter(category: &str, selected: &str) -> bool {
    selected.is_empty() || selected == "all" || category == selected
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::new(1),
                name: "Apparel".to_string(),
                created_at: None,
            },
            Category {
                id: CategoryId::new(2),
                name: "Drinkware".to_string(),
                created_at: None,
            },
        ]
    }

    #[test]
    fn test_product_deserializes_with_missing_fields() {
        let product: Product =
            serde_json::from_value(json!({"id": 1712345678901_i64, "name": "Mug"})).unwrap();
        assert_eq!(product.rating, 0.0);
        assert!(product.category.is_empty());
    }

    #[test]
    fn test_category_created_at() {
        let category: Category = serde_json::from_value(
            json!({"id": "3", "name": "Bags", "createdAt": "2024-05-01T10:00:00Z"}),
        )
        .unwrap();
        assert_eq!(category.id, CategoryId::new(3));
        assert!(category.created_at.is_some());
    }

    #[test]
    fn test_resolve_names() {
        let index = CategoryIndex::new(&categories());
        assert_eq!(index.resolve("Drinkware"), CategoryRef::Known(CategoryId::new(2)));
        assert_eq!(
            index.resolve("Old Name"),
            CategoryRef::Unresolved("Old Name".to_string())
        );
        assert_eq!(index.resolve(""), CategoryRef::Unassigned);
        assert_eq!(index.display(&CategoryRef::Known(CategoryId::new(1))), "Apparel");
    }

    #[test]
    fn test_form_category_id_becomes_name() {
        let index = CategoryIndex::new(&categories());
        let form = CatalogForm {
            title: " Travel Mug ".to_string(),
            category: "id:2".to_string(),
            description: "Insulated".to_string(),
            ..CatalogForm::default()
        };
        let submission = form.validate(CatalogKind::Product, &index).unwrap();
        assert_eq!(submission.category, "Drinkware");
        assert_eq!(submission.title, "Travel Mug");
        assert_eq!(submission.rating, 0.0);
        let body = submission.to_json();
        assert_eq!(body["name"], json!("Travel Mug"));
        assert!(body.get("title").is_none());
    }

    #[test]
    fn test_product_requires_category_service_does_not() {
        let index = CategoryIndex::new(&categories());
        let form = CatalogForm {
            title: "Embroidery".to_string(),
            description: "Logos on fabric".to_string(),
            ..CatalogForm::default()
        };
        assert_eq!(
            form.validate(CatalogKind::Product, &index),
            Err(CatalogFormError::CategoryRequired)
        );
        let service = form.validate(CatalogKind::Service, &index).unwrap();
        assert_eq!(service.to_json()["title"], json!("Embroidery"));
        assert_eq!(service.to_json()["category"], json!(""));
    }

    #[test]
    fn test_required_field_messages() {
        let index = CategoryIndex::default();
        let empty = CatalogForm::default();
        assert_eq!(
            empty.validate(CatalogKind::Product, &index).unwrap_err().to_string(),
            "Name is required"
        );
        assert_eq!(
            empty.validate(CatalogKind::Service, &index).unwrap_err().to_string(),
            "Title is required"
        );
        let no_description = CatalogForm {
            title: "x".to_string(),
            ..CatalogForm::default()
        };
        assert_eq!(
            no_description.validate(CatalogKind::Service, &index),
            Err(CatalogFormError::DescriptionRequired)
        );
    }

    #[test]
    fn test_rating_bounds() {
        let index = CategoryIndex::default();
        let mut form = CatalogForm {
            title: "x".to_string(),
            description: "y".to_string(),
            rating: Some("4.5".to_string()),
            ..CatalogForm::default()
        };
        assert_eq!(form.validate(CatalogKind::Service, &index).unwrap().rating, 4.5);
        form.rating = Some("7".to_string());
        assert_eq!(
            form.validate(CatalogKind::Service, &index),
            Err(CatalogFormError::RatingOutOfRange)
        );
    }

    #[test]
    fn test_fallback_category_name_passes_through() {
        let index = CategoryIndex::default();
        let form = CatalogForm {
            title: "Cap".to_string(),
            category: "name:Headwear".to_string(),
            description: "Branded".to_string(),
            ..CatalogForm::default()
        };
        let submission = form.validate(CatalogKind::Product, &index).unwrap();
        assert_eq!(submission.category, "Headwear");
    }

    #[test]
    fn test_numeric_category_name_is_not_an_id() {
        let index = CategoryIndex::new(&[Category {
            id: CategoryId::new(3),
            name: "Headwear".to_string(),
            created_at: None,
        }]);
        let service = Service {
            id: ServiceId::new(8),
            title: "Printing".to_string(),
            category: "3".to_string(),
            description: "Screen printing".to_string(),
            image: String::new(),
            rating: 0.0,
        };
        let form = CatalogForm::from_service(&service, &index);
        assert_eq!(form.category, "name:3");
        let submission = form.validate(CatalogKind::Service, &index).unwrap();
        assert_eq!(submission.category, "3");
    }

    #[test]
    fn test_unlisted_category_name_survives_an_edit() {
        let index = CategoryIndex::new(&categories());
        let product = Product {
            id: ProductId::new(5),
            name: "Calendar".to_string(),
            category: "2024".to_string(),
            description: "Wall calendar".to_string(),
            image: String::new(),
            rating: 0.0,
        };
        let form = CatalogForm::from_product(&product, &index);
        let submission = form.validate(CatalogKind::Product, &index).unwrap();
        assert_eq!(submission.category, "2024");
    }

    #[test]
    fn test_unknown_category_id_is_refused() {
        let form = CatalogForm {
            title: "Printing".to_string(),
            category: "id:2".to_string(),
            description: "Screen printing".to_string(),
            ..CatalogForm::default()
        };
        assert_eq!(
            form.validate(CatalogKind::Service, &CategoryIndex::default()),
            Err(CatalogFormError::UnknownCategory)
        );
    }

    #[test]
    fn test_selector_values() {
        assert_eq!(CategoryRef::Known(CategoryId::new(4)).form_value(), "id:4");
        assert_eq!(CategoryRef::from_form("id:4"), CategoryRef::Known(CategoryId::new(4)));
        assert_eq!(
            CategoryRef::from_form("name:id:4"),
            CategoryRef::Unresolved("id:4".to_string())
        );
        assert_eq!(CategoryRef::from_form(""), CategoryRef::Unassigned);
    }

    #[test]
    fn test_filter_categories() {
        assert_eq!(filter_categories(&[]).len(), 5);
        let names = filter_categories(&categories());
        assert_eq!(names, vec!["all", "Apparel", "Drinkware"]);
        assert!(matches_filter("Apparel", "all"));
        assert!(!matches_filter("Apparel", "Drinkware"));
    }
}
