//! About page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Response};
use reshow_core::content::{SectionId, defaults::experience_placeholders};
use tracing::instrument;

use super::Fallbacks;
use super::views::{PageLayout, SectionView};
use crate::content::about_sections;
use crate::filters;
use crate::middleware::AdminSession;
use crate::state::AppState;

/// Image shown in the experience grid.
pub struct ExperienceImage {
    pub url: String,
    pub alt: String,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: PageLayout,
    pub hero: SectionView,
    pub stats: SectionView,
    pub mission: SectionView,
    pub vision: SectionView,
    pub values: SectionView,
    pub partnership: SectionView,
    pub experience: SectionView,
    pub experience_images: Vec<ExperienceImage>,
}

/// Display the about page.
#[instrument(skip(state, admin))]
pub async fn about(State(state): State<AppState>, admin: AdminSession) -> Response {
    let token = admin.token().await;
    let token = token.as_ref();
    let content = state.content();

    let (navbar, doc) = tokio::join!(
        content.effective(SectionId::Navbar, token),
        content.about(token),
    );

    let api = state.backend().base_url();
    let mut fallbacks = Fallbacks::default();
    let navbar = fallbacks.section(SectionId::Navbar, navbar);
    let doc = fallbacks.take("about", doc.map(Some), || None);
    let mut sections = about_sections(doc.as_ref());
    let mut view = |id: SectionId| SectionView::new(sections.remove(&id).unwrap_or_default(), api);

    let experience = view(SectionId::Experience);
    let mut experience_images: Vec<ExperienceImage> = experience
        .items("images")
        .into_iter()
        .filter(|item| item.has("image"))
        .map(|item| ExperienceImage {
            url: item.image("image"),
            alt: item.text("alt"),
        })
        .collect();
    if experience_images.is_empty() {
        experience_images = experience_placeholders()
            .into_iter()
            .map(|(url, alt)| ExperienceImage { url, alt })
            .collect();
    }

    let page = AboutTemplate {
        layout: PageLayout::new("/about", &navbar, api),
        hero: view(SectionId::AboutHero),
        stats: view(SectionId::AboutStats),
        mission: view(SectionId::Mission),
        vision: view(SectionId::Vision),
        values: view(SectionId::Values),
        partnership: view(SectionId::Partnership),
        experience,
        experience_images,
    };
    fallbacks.respond(page)
}
