//! Gallery route handler.
//!
//! Slides advance with `static/js/gallery.js`; without scripts every image
//! is shown in a grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Response};
use reshow_core::content::SectionId;
use tracing::instrument;

use super::Fallbacks;
use super::views::{ItemView, PageLayout, SectionView};
use crate::filters;
use crate::middleware::AdminSession;
use crate::state::AppState;

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub layout: PageLayout,
    pub gallery: SectionView,
    pub images: Vec<ItemView>,
}

/// Display the gallery.
#[instrument(skip(state, admin))]
pub async fn gallery(State(state): State<AppState>, admin: AdminSession) -> Response {
    let token = admin.token().await;
    let token = token.as_ref();
    let content = state.content();

    let (navbar, gallery) = tokio::join!(
        content.effective(SectionId::Navbar, token),
        content.effective(SectionId::Gallery, token),
    );

    let api = state.backend().base_url();
    let mut fallbacks = Fallbacks::default();
    let navbar = fallbacks.section(SectionId::Navbar, navbar);
    let gallery = SectionView::new(fallbacks.section(SectionId::Gallery, gallery), api);
    let images = gallery
        .items("images")
        .into_iter()
        .filter(|item| item.has("image"))
        .collect();

    fallbacks.respond(GalleryTemplate {
        layout: PageLayout::new("/gallery", &navbar, api),
        gallery,
        images,
    })
}
