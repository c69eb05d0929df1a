//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Response};
use reshow_core::content::SectionId;
use tracing::instrument;

use super::Fallbacks;
use super::views::{PageLayout, SectionView};
use crate::filters;
use crate::middleware::AdminSession;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: PageLayout,
    pub hero: SectionView,
    pub why_choose: SectionView,
    pub categories: SectionView,
    pub showcase: SectionView,
    pub logos: SectionView,
}

/// Display the home page.
#[instrument(skip(state, admin))]
pub async fn home(State(state): State<AppState>, admin: AdminSession) -> Response {
    let token = admin.token().await;
    let token = token.as_ref();
    let content = state.content();

    let (navbar, hero, why_choose, categories, showcase, logos) = tokio::join!(
        content.effective(SectionId::Navbar, token),
        content.effective(SectionId::Hero, token),
        content.effective(SectionId::WhyChoose, token),
        content.effective(SectionId::ProductCategories, token),
        content.effective(SectionId::ProductShowcase, token),
        content.effective(SectionId::CompanyLogos, token),
    );

    let api = state.backend().base_url();
    let mut fallbacks = Fallbacks::default();
    let navbar = fallbacks.section(SectionId::Navbar, navbar);
    let view = |id: SectionId, result, fallbacks: &mut Fallbacks| {
        SectionView::new(fallbacks.section(id, result), api)
    };

    let page = HomeTemplate {
        layout: PageLayout::new("/", &navbar, api),
        hero: view(SectionId::Hero, hero, &mut fallbacks),
        why_choose: view(SectionId::WhyChoose, why_choose, &mut fallbacks),
        categories: view(SectionId::ProductCategories, categories, &mut fallbacks),
        showcase: view(SectionId::ProductShowcase, showcase, &mut fallbacks),
        logos: view(SectionId::CompanyLogos, logos, &mut fallbacks),
    };
    fallbacks.respond(page)
}
