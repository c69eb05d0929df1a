//! Effective content of every section.

use std::collections::BTreeMap;

use serde_json::Value;

use super::about::{AboutDocument, compose, decompose};
use super::defaults::{hardcoded, layer_page_values};
use super::{SectionContent, SectionId, as_content, merge};

/// Content read from page endpoints, used as defaults for their sections.
#[derive(Debug, Clone, Default)]
pub struct PageSources {
    /// `GET /content/hero`.
    pub hero: Option<SectionContent>,
    /// `GET /about`.
    pub about: Option<Value>,
    /// `GET /services-content`.
    pub services: Option<SectionContent>,
}

/// All seventeen sections, resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBundle {
    sections: BTreeMap<SectionId, SectionContent>,
}

impl ContentBundle {
    /// Resolve every section.
    ///
    /// Defaults are the hardcoded values with page-sourced values layered
    /// on top; the saved overrides map (`GET /admin/content`, keyed by
    /// section id) is then merged over them.
    #[must_use]
    pub fn resolve(overrides: &SectionContent, pages: &PageSources) -> Self {
        let about_parts: BTreeMap<SectionId, SectionContent> = pages
            .about
            .as_ref()
            .map(|doc| decompose(doc).into_iter().collect())
            .unwrap_or_default();

        let sections = SectionId::ALL
            .into_iter()
            .map(|id| {
                let mut defaults = hardcoded(id);
                let page = match id {
                    SectionId::Hero => pages.hero.as_ref(),
                    SectionId::Services => pages.services.as_ref(),
                    _ => about_parts.get(&id),
                };
                if let Some(page) = page {
                    defaults = layer_page_values(defaults, page);
                }
                let saved = as_content(overrides.get(id.as_str()));
                (id, merge(&defaults, &saved))
            })
            .collect();

        Self { sections }
    }

    /// Bundle of hardcoded defaults only.
    #[must_use]
    pub fn defaults() -> Self {
        Self::resolve(&SectionContent::new(), &PageSources::default())
    }

    /// Content of one section.
    #[must_use]
    pub fn get(&self, id: SectionId) -> &SectionContent {
        static EMPTY: std::sync::LazyLock<SectionContent> =
            std::sync::LazyLock::new(SectionContent::new);
        self.sections.get(&id).unwrap_or(&EMPTY)
    }

    /// Replace the content of one section.
    pub fn set(&mut self, id: SectionId, content: SectionContent) {
        self.sections.insert(id, content);
    }

    /// Sections saved through the generic content store, in editor order.
    pub fn non_about_sections(&self) -> impl Iterator<Item = (SectionId, &SectionContent)> {
        SectionId::non_about().map(|id| (id, self.get(id)))
    }

    /// The about document built from the seven about sections.
    #[must_use]
    pub fn about_document(&self) -> AboutDocument {
        let about: BTreeMap<SectionId, SectionContent> = SectionId::ABOUT_FAMILY
            .into_iter()
            .map(|id| (id, self.get(id).clone()))
            .collect();
        compose(&about)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: Value) -> SectionContent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_cover_all_sections() {
        let bundle = ContentBundle::defaults();
        for id in SectionId::ALL {
            assert!(!bundle.get(id).is_empty());
        }
        assert_eq!(bundle.non_about_sections().count(), 10);
    }

    #[test]
    fn test_override_beats_page_value_beats_default() {
        let overrides = content(json!({"hero": {"buttonText": "Get a Quote"}}));
        let pages = PageSources {
            hero: Some(content(json!({"title": "From Hero API", "buttonText": "Ignored"}))),
            ..PageSources::default()
        };
        let bundle = ContentBundle::resolve(&overrides, &pages);
        let hero = bundle.get(SectionId::Hero);
        assert_eq!(hero["title"], json!("From Hero API"));
        assert_eq!(hero["buttonText"], json!("Get a Quote"));
        assert_eq!(hero["image"], json!("/images/placeholder/hero-image.jpg"));
    }

    #[test]
    fn test_about_document_feeds_about_sections() {
        let pages = PageSources {
            about: Some(json!({"mission": {"title": "Why we exist", "content": "To brand."}})),
            ..PageSources::default()
        };
        let bundle = ContentBundle::resolve(&SectionContent::new(), &pages);
        assert_eq!(bundle.get(SectionId::Mission)["content"], json!("To brand."));
        assert_eq!(bundle.get(SectionId::Vision)["title"], json!("Our Vision"));

        let doc = bundle.about_document();
        assert_eq!(doc.mission.title, "Why we exist");
        assert_eq!(doc.stats.years, "10+");
        assert_eq!(doc.values.len(), 3);
    }

    #[test]
    fn test_non_object_override_is_ignored() {
        let overrides = content(json!({"contact": "broken"}));
        let bundle = ContentBundle::resolve(&overrides, &PageSources::default());
        assert_eq!(bundle.get(SectionId::Contact)["email"], json!("sales@reshow.co.zw"));
    }
}
