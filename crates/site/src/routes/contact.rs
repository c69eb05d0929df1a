//! Contact page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Response};
use reshow_core::contact::ContactMessage;
use reshow_core::content::SectionId;
use tracing::instrument;

use super::Fallbacks;
use super::views::{PageLayout, SectionView};
use crate::filters;
use crate::middleware::AdminSession;
use crate::state::AppState;

/// Banner shown after the message was accepted.
pub const SENT_NOTICE: &str = "Message sent successfully! We'll get back to you soon.";

/// Shown when the backend refuses or cannot be reached.
pub const SEND_FAILED: &str = "Failed to send message. Please try again.";

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: PageLayout,
    pub contact: SectionView,
    pub address_lines: Vec<String>,
    pub form: ContactMessage,
    pub sent: bool,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    admin: &AdminSession,
    form: ContactMessage,
    sent: bool,
    error: Option<String>,
) -> Response {
    let token = admin.token().await;
    let token = token.as_ref();
    let content = state.content();

    let (navbar, contact) = tokio::join!(
        content.effective(SectionId::Navbar, token),
        content.effective(SectionId::Contact, token),
    );

    let api = state.backend().base_url();
    let mut fallbacks = Fallbacks::default();
    let navbar = fallbacks.section(SectionId::Navbar, navbar);
    let contact = SectionView::new(fallbacks.section(SectionId::Contact, contact), api);
    let address_lines = contact
        .text("address")
        .split(',')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    fallbacks.respond(ContactTemplate {
        layout: PageLayout::new("/contact", &navbar, api),
        contact,
        address_lines,
        form,
        sent,
        error,
    })
}

/// Display the contact page.
#[instrument(skip(state, admin))]
pub async fn show(State(state): State<AppState>, admin: AdminSession) -> Response {
    render(&state, &admin, ContactMessage::default(), false, None).await
}

/// Send the contact form.
///
/// The message is posted once. On success the form comes back empty with
/// a banner; on failure the entered values are kept.
#[instrument(skip(state, admin, form))]
pub async fn send(
    State(state): State<AppState>,
    admin: AdminSession,
    Form(form): Form<ContactMessage>,
) -> Response {
    if let Err(missing) = form.validate() {
        return render(&state, &admin, form, false, Some(missing.to_string())).await;
    }

    match state.backend().send_contact(&form).await {
        Ok(()) => {
            tracing::info!("Contact message sent");
            render(&state, &admin, ContactMessage::default(), true, None).await
        }
        Err(e) => {
            tracing::error!("Failed to send contact message: {e}");
            render(&state, &admin, form, false, Some(SEND_FAILED.to_string())).await
        }
    }
}
