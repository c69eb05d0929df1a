//! The visitor's quote cart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::QuoteLine;
use crate::catalog::Product;
use crate::types::ProductId;

/// A product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub image: String,
    pub quantity: u32,
}

/// Products a visitor wants a quote for.
///
/// Each product appears at most once; adding it again raises its quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCart {
    lines: Vec<CartLine>,
}

impl QuoteCart {
    /// Add one of `product`.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id,
            product_name: product.name.clone(),
            image: product.image.clone(),
            quantity: 1,
        });
    }

    /// Set the quantity of a product; zero or less removes it.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Remove a product.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Build the quote request for `requester`.
    pub fn to_submission(
        &self,
        requester: &QuoteRequester,
    ) -> Result<QuoteSubmission, RequesterError> {
        if self.is_empty() {
            return Err(RequesterError::EmptyCart);
        }
        let name = requester.name_or_company.trim();
        let email = requester.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(RequesterError::MissingContact);
        }
        Ok(QuoteSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: requester.phone.trim().to_string(),
            company: name.to_string(),
            products: self
                .lines
                .iter()
                .map(|l| QuoteLine {
                    product_id: l.product_id,
                    product_name: l.product_name.clone(),
                    quantity: l.quantity,
                })
                .collect(),
            message: String::new(),
        })
    }
}

/// Contact details on the quote form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequester {
    #[serde(default)]
    pub name_or_company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Quote form validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequesterError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Name/Company and Email are required")]
    MissingContact,
}

/// Body of `POST /quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub products: Vec<QuoteLine>,
    pub message: String,
}
