//! Display types shared by page templates.

use reshow_core::api_url::resolve_image_url;
use reshow_core::content::{
    SectionContent, SectionId, defaults::hardcoded, list_of, text_of, value_text,
};
use reshow_core::rating::StarRating;
use reshow_core::types::LogoDisplay;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Public navigation entries.
const NAV_LINKS: [(&str, &str); 5] = [
    ("/", "Home"),
    ("/about", "About Us"),
    ("/services", "Services"),
    ("/gallery", "Gallery"),
    ("/contact", "Contact"),
];

/// Content of one section, ready for a template.
///
/// Images resolve against the backend so uploads load from its origin.
#[derive(Debug, Clone)]
pub struct SectionView {
    content: SectionContent,
    api_base: String,
}

impl SectionView {
    #[must_use]
    pub fn new(content: SectionContent, api_base: &str) -> Self {
        Self {
            content,
            api_base: api_base.to_string(),
        }
    }

    pub fn text(&self, key: &str) -> String {
        text_of(&self.content, key)
    }

    pub fn has(&self, key: &str) -> bool {
        !self.text(key).trim().is_empty()
    }

    pub fn image(&self, key: &str) -> String {
        resolve_image_url(&self.text(key), &self.api_base)
    }

    /// Object items of a list field.
    pub fn items(&self, key: &str) -> Vec<ItemView> {
        list_of(&self.content, key)
            .iter()
            .filter_map(Value::as_object)
            .map(|fields| ItemView {
                fields: fields.clone(),
                api_base: self.api_base.clone(),
            })
            .collect()
    }

    /// String items of a list field.
    pub fn strings(&self, key: &str) -> Vec<String> {
        list_of(&self.content, key)
            .iter()
            .map(|v| value_text(Some(v)))
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// One object in a section list.
#[derive(Debug, Clone)]
pub struct ItemView {
    fields: Map<String, Value>,
    api_base: String,
}

impl ItemView {
    pub fn text(&self, key: &str) -> String {
        value_text(self.fields.get(key))
    }

    pub fn has(&self, key: &str) -> bool {
        !self.text(key).trim().is_empty()
    }

    pub fn image(&self, key: &str) -> String {
        resolve_image_url(&self.text(key), &self.api_base)
    }
}

#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Navbar wordmark and logo.
#[derive(Debug, Clone)]
pub struct Brand {
    pub name: String,
    pub logo_url: String,
    pub show_logo: bool,
    pub show_text: bool,
}

impl Brand {
    fn from_navbar(navbar: &SectionContent, name: String, api_base: &str) -> Self {
        let logo = text_of(navbar, "logoImage");
        let has_image = !logo.trim().is_empty();
        let display = LogoDisplay::from_stored(&text_of(navbar, "logoDisplay"));
        Self {
            name,
            logo_url: resolve_image_url(&logo, api_base),
            show_logo: display.shows_logo(has_image),
            show_text: display.shows_text(has_image),
        }
    }
}

/// Chrome around every public page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub nav: Vec<NavLink>,
    pub brand: Brand,
    pub footer: SectionView,
}

impl PageLayout {
    /// Layout for the page at `path`, with the navbar's saved content.
    #[must_use]
    pub fn new(path: &str, navbar: &SectionContent, api_base: &str) -> Self {
        let footer = hardcoded(SectionId::Footer);
        let name = text_of(&footer, "companyName");
        Self {
            nav: NAV_LINKS
                .into_iter()
                .map(|(href, label)| NavLink {
                    href,
                    label,
                    active: href == path,
                })
                .collect(),
            brand: Brand::from_navbar(navbar, name, api_base),
            footer: SectionView::new(footer, api_base),
        }
    }
}

/// Star rating display.
#[derive(Debug, Clone)]
pub struct RatingView {
    pub classes: Vec<&'static str>,
    pub label: String,
}

impl RatingView {
    #[must_use]
    pub fn new(rating: f64) -> Self {
        let stars = StarRating::new(rating);
        Self {
            classes: stars.stars().iter().map(|s| s.css_class()).collect(),
            label: stars.label(),
        }
    }
}

/// Success and error banners carried through a redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            error: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }

    /// `path` with this flash appended as query parameters.
    #[must_use]
    pub fn redirect_url(&self, path: &str) -> String {
        let mut params = Vec::new();
        if let Some(message) = &self.success {
            params.push(format!("success={}", urlencoding::encode(message)));
        }
        if let Some(message) = &self.error {
            params.push(format!("error={}", urlencoding::encode(message)));
        }
        if params.is_empty() {
            return path.to_string();
        }
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}{}", params.join("&"))
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: Value) -> SectionContent {
        match value {
            Value::Object(map) => map,
            _ => SectionContent::new(),
        }
    }

    #[test]
    fn test_section_view_resolves_uploads() {
        let view = SectionView::new(
            content(json!({"image": "/uploads/hero.jpg", "title": "Hi"})),
            "http://api.test/api",
        );
        assert_eq!(view.image("image"), "http://api.test/uploads/hero.jpg");
        assert!(view.has("title"));
        assert!(!view.has("missing"));
    }

    #[test]
    fn test_section_view_lists() {
        let view = SectionView::new(
            content(json!({
                "benefits": ["Fast", "", "Local"],
                "logos": [{"name": "Acme", "image": ""}, "stray"],
            })),
            "http://api.test/api",
        );
        assert_eq!(view.strings("benefits"), vec!["Fast", "Local"]);
        let logos = view.items("logos");
        assert_eq!(logos.len(), 1);
        assert_eq!(logos[0].text("name"), "Acme");
        assert_eq!(logos[0].image("image"), "/images/placeholder.jpg");
    }

    #[test]
    fn test_layout_marks_active_link() {
        let layout = PageLayout::new("/gallery", &SectionContent::new(), "http://api.test/api");
        let active: Vec<_> = layout.nav.iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "Gallery");
        assert!(layout.brand.show_text);
        assert!(!layout.brand.show_logo);
    }

    #[test]
    fn test_logo_only_without_image_shows_text() {
        let navbar = content(json!({"logoDisplay": "logo", "logoImage": ""}));
        let layout = PageLayout::new("/", &navbar, "http://api.test/api");
        assert!(layout.brand.show_text);
        assert!(!layout.brand.show_logo);

        let navbar = content(json!({"logoDisplay": "logo", "logoImage": "/uploads/logo.png"}));
        let layout = PageLayout::new("/", &navbar, "http://api.test/api");
        assert!(!layout.brand.show_text);
        assert!(layout.brand.show_logo);
        assert_eq!(layout.brand.logo_url, "http://api.test/uploads/logo.png");
    }

    #[test]
    fn test_flash_redirect_url() {
        assert_eq!(Flash::default().redirect_url("/admin"), "/admin");
        assert_eq!(
            Flash::success("Saved ok!").redirect_url("/admin/content?section=hero"),
            "/admin/content?section=hero&success=Saved%20ok%21"
        );
        assert_eq!(
            Flash::error("No").redirect_url("/admin/quotes"),
            "/admin/quotes?error=No"
        );
    }
}
