//! Quote requests.
//!
//! Visitors collect products in a [`QuoteCart`] and submit it as a quote
//! request; admins work through submitted requests in the inbox and move
//! them between statuses.

mod cart;
mod links;

pub use cart::{CartLine, QuoteCart, QuoteRequester, QuoteSubmission, RequesterError};
pub use links::{PhoneRequired, reply_mailto, whatsapp_link};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, QuoteId, QuoteStatus};

/// One requested product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// A submitted quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub products: Vec<QuoteLine>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// Phone number if one was given.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Company if it differs from the requester name.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != self.name)
    }
}

/// Body of `PATCH /quotes/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: QuoteStatus,
}
