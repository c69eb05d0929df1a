//! Quote inbox.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::QuoteId;
use reshow_core::quote::{Quote, reply_mailto, whatsapp_link};
use reshow_core::types::QuoteStatus;
use serde::Deserialize;
use tracing::instrument;

use super::{AdminLayout, LoadError, render_after};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CurrentAdmin, RequireAdminAuth};
use crate::routes::Flash;
use crate::state::AppState;

const QUOTES_PATH: &str = "/admin/quotes";

/// A status button.
#[derive(Debug, Clone)]
pub struct StatusAction {
    pub value: &'static str,
    pub label: &'static str,
    pub current: bool,
}

/// One request as listed in the inbox.
#[derive(Debug, Clone)]
pub struct QuoteRow {
    pub id: QuoteId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub products: Vec<(String, u32)>,
    pub message: String,
    pub status: &'static str,
    pub created_at: String,
    pub actions: Vec<StatusAction>,
}

impl From<&Quote> for QuoteRow {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id,
            name: quote.name.clone(),
            email: quote.email.clone(),
            phone: quote.phone().unwrap_or_default().to_string(),
            company: quote.company().map(str::to_string),
            products: quote
                .products
                .iter()
                .map(|p| (p.product_name.clone(), p.quantity))
                .collect(),
            message: quote.message.clone(),
            status: quote.status.as_str(),
            created_at: quote
                .created_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
            actions: QuoteStatus::ALL
                .into_iter()
                .map(|status| StatusAction {
                    value: status.as_str(),
                    label: status.action_label(),
                    current: status == quote.status,
                })
                .collect(),
        }
    }
}

/// Inbox template.
#[derive(Template)]
#[template(path = "admin/quotes.html")]
pub struct QuotesTemplate {
    pub layout: AdminLayout,
    pub quotes: Vec<QuoteRow>,
    pub load_error: Option<LoadError>,
    pub flash: Flash,
}

/// Status change form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: QuoteStatus,
}

/// Number typed in the inbox before opening WhatsApp.
#[derive(Debug, Default, Deserialize)]
pub struct WhatsappQuery {
    #[serde(default)]
    pub phone: Option<String>,
}

fn back(flash: &Flash) -> Response {
    Redirect::to(&flash.redirect_url(QUOTES_PATH)).into_response()
}

/// The quote with `id`, or a redirect back to the inbox.
async fn find_quote(
    state: &AppState,
    admin: &CurrentAdmin,
    id: QuoteId,
) -> Result<std::result::Result<Quote, Response>> {
    let quotes = state.backend().quotes(&admin.token).await?;
    Ok(quotes
        .into_iter()
        .find(|q| q.id == id)
        .ok_or_else(|| back(&Flash::error("Quote request not found"))))
}

/// List quote requests, newest first.
///
/// GET /admin/quotes
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(flash): Query<Flash>,
) -> Response {
    let result = state.backend().quotes(&admin.token).await;
    let (quotes, load_error) = match &result {
        Ok(quotes) => {
            let mut quotes: Vec<&Quote> = quotes.iter().collect();
            quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            (quotes.into_iter().map(QuoteRow::from).collect(), None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch quotes: {e}");
            (Vec::new(), Some(LoadError::new(e)))
        }
    };

    let template = QuotesTemplate {
        layout: AdminLayout::new(&state, &admin, QUOTES_PATH),
        quotes,
        load_error,
        flash,
    };
    render_after(&template, &[result.as_ref().err()])
}

/// Move a request to another status.
///
/// POST /admin/quotes/{id}/status
#[instrument(skip(state, admin))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<QuoteId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    match state
        .backend()
        .set_quote_status(&admin.token, id, form.status)
        .await
    {
        Ok(()) => {
            add_breadcrumb(
                "quotes",
                "Changed quote status",
                Some(&[("status", form.status.as_str())]),
            );
            tracing::info!(quote_id = %id, status = %form.status, "Quote status updated");
            Ok(back(&Flash::default()))
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!(quote_id = %id, "Failed to update status: {e}");
            Ok(back(&Flash::error(e.message_or("Failed to update status"))))
        }
    }
}

/// Hand a prefilled reply to the admin's mail client.
///
/// GET /admin/quotes/{id}/reply
#[instrument(skip(state, admin))]
pub async fn reply(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<QuoteId>,
) -> Result<Response> {
    Ok(match find_quote(&state, &admin, id).await? {
        Ok(quote) => Redirect::to(&reply_mailto(&quote)).into_response(),
        Err(redirect) => redirect,
    })
}

/// Hand a prefilled message to WhatsApp.
///
/// GET /admin/quotes/{id}/whatsapp?phone=
#[instrument(skip(state, admin))]
pub async fn whatsapp(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<QuoteId>,
    Query(query): Query<WhatsappQuery>,
) -> Result<Response> {
    let quote = match find_quote(&state, &admin, id).await? {
        Ok(quote) => quote,
        Err(redirect) => return Ok(redirect),
    };
    Ok(match whatsapp_link(&quote, query.phone.as_deref()) {
        Ok(link) => Redirect::to(&link).into_response(),
        Err(e) => back(&Flash::error(e.to_string())),
    })
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reshow_core::ProductId;
    use reshow_core::quote::QuoteLine;

    #[test]
    fn test_quote_row() {
        let quote = Quote {
            id: QuoteId::new(3),
            name: "Tanaka".to_string(),
            email: "t@example.com".to_string(),
            phone: Some("  ".to_string()),
            company: Some("Tanaka".to_string()),
            products: vec![QuoteLine {
                product_id: ProductId::new(1),
                product_name: "Caps".to_string(),
                quantity: 40,
            }],
            message: String::new(),
            status: QuoteStatus::Approved,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single(),
        };

        let row = QuoteRow::from(&quote);
        assert_eq!(row.phone, "");
        assert_eq!(row.company, None);
        assert_eq!(row.products, vec![("Caps".to_string(), 40)]);
        assert_eq!(row.status, "approved");
        assert!(row.created_at.starts_with("2024-05-01T09:00:00"));
        let current: Vec<_> = row.actions.iter().filter(|a| a.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].label, "Approve");
    }
}
