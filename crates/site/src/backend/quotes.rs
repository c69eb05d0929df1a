//! Visitor submissions and the quote inbox.

use reshow_core::QuoteId;
use reshow_core::contact::ContactMessage;
use reshow_core::quote::{Quote, QuoteSubmission, StatusUpdate};
use reshow_core::types::QuoteStatus;
use secrecy::SecretString;
use serde_json::json;
use tracing::instrument;

use super::{ApiError, BackendClient};

impl BackendClient {
    /// Submit a quote request (`POST /quotes`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, submission), fields(lines = submission.products.len()))]
    pub async fn submit_quote(&self, submission: &QuoteSubmission) -> Result<(), ApiError> {
        self.post_discarding("/quotes", None, submission).await
    }

    /// Every quote request (`GET /quotes`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn quotes(&self, token: &SecretString) -> Result<Vec<Quote>, ApiError> {
        let quotes: Option<Vec<Quote>> = self.get("/quotes", Some(token)).await?;
        Ok(quotes.unwrap_or_default())
    }

    /// Set the status of a quote (`PATCH /quotes/:id`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token), fields(quote_id = %id, status = %status))]
    pub async fn set_quote_status(
        &self,
        token: &SecretString,
        id: QuoteId,
        status: QuoteStatus,
    ) -> Result<(), ApiError> {
        self.patch(
            &format!("/quotes/{id}"),
            Some(token),
            &StatusUpdate { status },
        )
        .await
    }

    /// Send a contact form message (`POST /contact`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        self.post_discarding("/contact", None, message).await
    }

    /// Record a page view (`POST /visitors/track`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn track_visit(&self) -> Result<(), ApiError> {
        self.post_discarding("/visitors/track", None, &json!({}))
            .await
    }
}
