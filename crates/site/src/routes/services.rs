//! Services page route handlers.
//!
//! The page lists services and products with category filters. Visitors
//! collect products in a quote cart kept in their session and submit it as
//! one quote request. Products and services can be rated from their cards.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::api_url::resolve_image_url;
use reshow_core::catalog::{Category, Product, Service, filter_categories, matches_filter};
use reshow_core::content::SectionId;
use reshow_core::quote::{QuoteCart, QuoteRequester, RequesterError};
use reshow_core::rating::RatingInput;
use reshow_core::{ProductId, ServiceId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Fallbacks;
use super::views::{Flash, PageLayout, RatingView, SectionView};
use crate::filters;
use crate::middleware::AdminSession;
use crate::middleware::session::keys;
use crate::state::AppState;

pub const QUOTE_SENT: &str = "Quote request submitted successfully! We will contact you soon.";
pub const QUOTE_FAILED: &str = "Failed to submit quote request. Please try again.";
pub const RATING_THANKS: &str = "Thank you for rating!";
pub const RATING_FAILED: &str = "Failed to submit rating. Please try again.";

const CART_ANCHOR: &str = "/services#quote-cart";

// =============================================================================
// View Types
// =============================================================================

/// A product card.
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub rating: RatingView,
}

/// A service card.
pub struct ServiceCard {
    pub id: ServiceId,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
    pub rating: RatingView,
}

/// A cart line with its quantity controls.
pub struct CartLineView {
    pub product_id: ProductId,
    pub product_name: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub decrement: i64,
    pub increment: i64,
}

/// One button of a category filter bar.
pub struct FilterLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Services page query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub service_category: Option<String>,
    /// Open the quote form under the cart.
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(flatten)]
    pub flash: Flash,
}

impl ServicesQuery {
    fn product_filter(&self) -> &str {
        self.category.as_deref().unwrap_or("all")
    }

    fn service_filter(&self) -> &str {
        self.service_category.as_deref().unwrap_or("all")
    }

    fn href(product: &str, service: &str) -> String {
        format!(
            "/services?category={}&service_category={}",
            urlencoding::encode(product),
            urlencoding::encode(service)
        )
    }
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub layout: PageLayout,
    pub header: SectionView,
    pub product_filters: Vec<FilterLink>,
    pub service_filters: Vec<FilterLink>,
    pub services: Vec<ServiceCard>,
    pub has_services: bool,
    pub products: Vec<ProductCard>,
    pub has_products: bool,
    pub cart: Vec<CartLineView>,
    pub total_items: u32,
    pub show_quote_form: bool,
    pub requester: QuoteRequester,
    pub flash: Flash,
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn filter_links(names: &[String], query: &ServicesQuery) -> (Vec<FilterLink>, Vec<FilterLink>) {
    let products = names
        .iter()
        .map(|name| FilterLink {
            label: capitalize(name),
            href: ServicesQuery::href(name, query.service_filter()),
            active: name == query.product_filter(),
        })
        .collect();
    let services = names
        .iter()
        .map(|name| FilterLink {
            label: if name == "all" {
                "All Services".to_string()
            } else {
                name.clone()
            },
            href: ServicesQuery::href(query.product_filter(), name),
            active: name == query.service_filter(),
        })
        .collect();
    (products, services)
}

fn cart_view(cart: &QuoteCart, api: &str) -> Vec<CartLineView> {
    cart.lines()
        .iter()
        .map(|line| CartLineView {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            image_url: (!line.image.trim().is_empty())
                .then(|| resolve_image_url(&line.image, api)),
            quantity: line.quantity,
            decrement: i64::from(line.quantity) - 1,
            increment: i64::from(line.quantity) + 1,
        })
        .collect()
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_cart(session: &Session) -> QuoteCart {
    session
        .get::<QuoteCart>(keys::QUOTE_CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn store_cart(session: &Session, cart: &QuoteCart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::QUOTE_CART, cart).await
}

// =============================================================================
// Page
// =============================================================================

/// What the cart panel shows besides the lines.
#[derive(Debug, Default)]
struct QuoteForm {
    open: bool,
    requester: QuoteRequester,
}

async fn render(
    state: &AppState,
    admin: &AdminSession,
    query: &ServicesQuery,
    cart: &QuoteCart,
    form: QuoteForm,
    flash: Flash,
) -> Response {
    let token = admin.token().await;
    let token = token.as_ref();
    let backend = state.backend();
    let content = state.content();

    let (navbar, header, products, services, categories) = tokio::join!(
        content.effective(SectionId::Navbar, token),
        content.services_header(token),
        backend.products(token),
        backend.services(token),
        backend.categories(token),
    );

    let api = backend.base_url();
    let mut fallbacks = Fallbacks::default();
    let navbar = fallbacks.section(SectionId::Navbar, navbar);
    let header = fallbacks.section(SectionId::Services, header);
    let products: Vec<Product> = fallbacks.take("products", products, Vec::new);
    let services: Vec<Service> = fallbacks.take("services", services, Vec::new);
    let categories: Vec<Category> = fallbacks.take("categories", categories, Vec::new);

    let (product_filters, service_filters) = filter_links(&filter_categories(&categories), query);

    let has_services = !services.is_empty();
    let services = services
        .into_iter()
        .filter(|s| matches_filter(&s.category, query.service_filter()))
        .map(|s| ServiceCard {
            id: s.id,
            image_url: (!s.image.trim().is_empty()).then(|| resolve_image_url(&s.image, api)),
            rating: RatingView::new(s.rating),
            title: s.title,
            category: s.category,
            description: s.description,
        })
        .collect();

    let has_products = !products.is_empty();
    let products = products
        .into_iter()
        .filter(|p| matches_filter(&p.category, query.product_filter()))
        .map(|p| ProductCard {
            id: p.id,
            image_url: resolve_image_url(&p.image, api),
            rating: RatingView::new(p.rating),
            name: p.name,
            category: p.category,
            description: p.description,
        })
        .collect();

    let page = ServicesTemplate {
        layout: PageLayout::new("/services", &navbar, api),
        header: SectionView::new(header, api),
        product_filters,
        service_filters,
        services,
        has_services,
        products,
        has_products,
        cart: cart_view(cart, api),
        total_items: cart.lines().iter().map(|l| l.quantity).sum(),
        show_quote_form: form.open && !cart.is_empty(),
        requester: form.requester,
        flash,
    };
    fallbacks.respond(page)
}

/// Display the services page.
#[instrument(skip(state, admin, session))]
pub async fn index(
    State(state): State<AppState>,
    admin: AdminSession,
    session: Session,
    Query(query): Query<ServicesQuery>,
) -> Response {
    let cart = load_cart(&session).await;
    let mut flash = query.flash.clone();
    let open = query.quote.is_some();
    if open && cart.is_empty() {
        flash = Flash::error(RequesterError::EmptyCart.to_string());
    }
    let form = QuoteForm {
        open,
        requester: QuoteRequester::default(),
    };
    render(&state, &admin, &query, &cart, form, flash).await
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CartProductForm {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
pub struct CartQuantityForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

async fn save_and_return(session: &Session, cart: &QuoteCart) -> Response {
    if let Err(e) = store_cart(session, cart).await {
        tracing::error!("Failed to store quote cart: {e}");
    }
    Redirect::to(CART_ANCHOR).into_response()
}

/// Add a product to the quote cart.
#[instrument(skip(state, admin, session))]
pub async fn cart_add(
    State(state): State<AppState>,
    admin: AdminSession,
    session: Session,
    Form(form): Form<CartProductForm>,
) -> Response {
    let token = admin.token().await;
    let product = match state.backend().products(token.as_ref()).await {
        Ok(products) => products.into_iter().find(|p| p.id == form.product_id),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            None
        }
    };
    let Some(product) = product else {
        tracing::warn!(product_id = %form.product_id, "Product to add is not listed");
        return Redirect::to("/services").into_response();
    };

    let mut cart = load_cart(&session).await;
    cart.add(&product);
    save_and_return(&session, &cart).await
}

/// Change the quantity of a cart line; zero or less removes it.
#[instrument(skip(session))]
pub async fn cart_update(session: Session, Form(form): Form<CartQuantityForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(form.product_id, form.quantity);
    save_and_return(&session, &cart).await
}

/// Remove a product from the cart.
#[instrument(skip(session))]
pub async fn cart_remove(session: Session, Form(form): Form<CartProductForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.remove(form.product_id);
    save_and_return(&session, &cart).await
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn cart_clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_and_return(&session, &cart).await
}

/// Submit the cart as a quote request.
///
/// Success empties the cart. Any failure keeps the cart and the entered
/// contact details.
#[instrument(skip(state, admin, session, requester))]
pub async fn submit_quote(
    State(state): State<AppState>,
    admin: AdminSession,
    session: Session,
    Form(requester): Form<QuoteRequester>,
) -> Response {
    let mut cart = load_cart(&session).await;
    let query = ServicesQuery::default();

    let submission = match cart.to_submission(&requester) {
        Ok(submission) => submission,
        Err(e) => {
            let form = QuoteForm {
                open: true,
                requester,
            };
            return render(&state, &admin, &query, &cart, form, Flash::error(e.to_string())).await;
        }
    };

    match state.backend().submit_quote(&submission).await {
        Ok(()) => {
            tracing::info!(products = submission.products.len(), "Quote request submitted");
            cart.clear();
            if let Err(e) = store_cart(&session, &cart).await {
                tracing::error!("Failed to clear quote cart: {e}");
            }
            Redirect::to(&Flash::success(QUOTE_SENT).redirect_url("/services")).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to submit quote: {e}");
            let form = QuoteForm {
                open: true,
                requester,
            };
            render(&state, &admin, &query, &cart, form, Flash::error(QUOTE_FAILED)).await
        }
    }
}

// =============================================================================
// Ratings
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RatingForm {
    #[serde(default)]
    pub rating: String,
}

fn rating_result<E: std::fmt::Display>(what: &str, result: Result<(), E>) -> Response {
    let flash = match result {
        Ok(()) => Flash::success(RATING_THANKS),
        Err(e) => {
            tracing::error!("Failed to rate {what}: {e}");
            Flash::error(RATING_FAILED)
        }
    };
    Redirect::to(&flash.redirect_url("/services")).into_response()
}

/// Rate a product.
#[instrument(skip(state))]
pub async fn rate_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<RatingForm>,
) -> Response {
    let result = match RatingInput::parse(&form.rating) {
        Ok(rating) => state
            .backend()
            .rate_product(id, rating)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    rating_result("product", result)
}

/// Rate a service.
#[instrument(skip(state))]
pub async fn rate_service(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Form(form): Form<RatingForm>,
) -> Response {
    let result = match RatingInput::parse(&form.rating) {
        Ok(rating) => state
            .backend()
            .rate_service(id, rating)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    rating_result("service", result)
}
