//! Catalog endpoints: products, services, categories.
//!
//! List endpoints tolerate a missing or `null` collection and return an
//! empty list for it.

use reshow_core::catalog::{CatalogSubmission, Category, Product, Service};
use reshow_core::rating::RatingInput;
use reshow_core::{CategoryId, ProductId, ServiceId};
use secrecy::SecretString;
use serde_json::json;
use tracing::instrument;

use super::{ApiError, BackendClient};

impl BackendClient {
    /// All products (`GET /products`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn products(&self, token: Option<&SecretString>) -> Result<Vec<Product>, ApiError> {
        let products: Option<Vec<Product>> = self.get("/products", token).await?;
        Ok(products.unwrap_or_default())
    }

    /// Create a product (`POST /products`).
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the product or the request fails.
    #[instrument(skip(self, token, product), fields(name = %product.title))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        product: &CatalogSubmission,
    ) -> Result<(), ApiError> {
        self.post_discarding("/products", Some(token), &product.to_json())
            .await
    }

    /// Update a product (`PUT /products/:id`).
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the product or the request fails.
    #[instrument(skip(self, token, product), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: ProductId,
        product: &CatalogSubmission,
    ) -> Result<(), ApiError> {
        self.put(&format!("/products/{id}"), Some(token), &product.to_json())
            .await
    }

    /// Delete a product (`DELETE /products/:id`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &SecretString, id: ProductId) -> Result<(), ApiError> {
        self.delete(&format!("/products/{id}"), Some(token)).await
    }

    /// Rate a product (`POST /products/:id/rate`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(product_id = %id, rating = rating.get()))]
    pub async fn rate_product(&self, id: ProductId, rating: RatingInput) -> Result<(), ApiError> {
        self.post_discarding(
            &format!("/products/{id}/rate"),
            None,
            &json!({ "rating": rating.get() }),
        )
        .await
    }

    /// All services (`GET /services-content/items`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn services(&self, token: Option<&SecretString>) -> Result<Vec<Service>, ApiError> {
        let services: Option<Vec<Service>> = self.get("/services-content/items", token).await?;
        Ok(services.unwrap_or_default())
    }

    /// Create a service (`POST /services-content/items`).
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the service or the request fails.
    #[instrument(skip(self, token, service), fields(title = %service.title))]
    pub async fn create_service(
        &self,
        token: &SecretString,
        service: &CatalogSubmission,
    ) -> Result<(), ApiError> {
        self.post_discarding("/services-content/items", Some(token), &service.to_json())
            .await
    }

    /// Update a service (`PUT /services-content/items/:id`).
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the service or the request fails.
    #[instrument(skip(self, token, service), fields(service_id = %id))]
    pub async fn update_service(
        &self,
        token: &SecretString,
        id: ServiceId,
        service: &CatalogSubmission,
    ) -> Result<(), ApiError> {
        self.put(
            &format!("/services-content/items/{id}"),
            Some(token),
            &service.to_json(),
        )
        .await
    }

    /// Delete a service (`DELETE /services-content/items/:id`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token), fields(service_id = %id))]
    pub async fn delete_service(&self, token: &SecretString, id: ServiceId) -> Result<(), ApiError> {
        self.delete(&format!("/services-content/items/{id}"), Some(token))
            .await
    }

    /// Rate a service (`POST /services-content/items/:id/rate`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(service_id = %id, rating = rating.get()))]
    pub async fn rate_service(&self, id: ServiceId, rating: RatingInput) -> Result<(), ApiError> {
        self.post_discarding(
            &format!("/services-content/items/{id}/rate"),
            None,
            &json!({ "rating": rating.get() }),
        )
        .await
    }

    /// All categories (`GET /categories`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn categories(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<Category>, ApiError> {
        let categories: Option<Vec<Category>> = self.get("/categories", token).await?;
        Ok(categories.unwrap_or_default())
    }

    /// Create a category (`POST /categories`).
    ///
    /// # Errors
    ///
    /// Returns error if the name is rejected (e.g. duplicate) or the request
    /// fails.
    #[instrument(skip(self, token))]
    pub async fn create_category(&self, token: &SecretString, name: &str) -> Result<(), ApiError> {
        self.post_discarding("/categories", Some(token), &json!({ "name": name }))
            .await
    }

    /// Delete a category (`DELETE /categories/:id`).
    ///
    /// # Errors
    ///
    /// Returns `Conflict` while products or services still reference it.
    #[instrument(skip(self, token), fields(category_id = %id))]
    pub async fn delete_category(
        &self,
        token: &SecretString,
        id: CategoryId,
    ) -> Result<(), ApiError> {
        self.delete(&format!("/categories/{id}"), Some(token)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::routing::get;

    use super::super::tests::{client, serve};

    #[tokio::test]
    async fn test_null_collections_read_as_empty() {
        let app = Router::new()
            .route("/api/products", get(|| async { "null" }))
            .route("/api/categories", get(|| async { "" }))
            .route(
                "/api/services-content/items",
                get(|| async {
                    axum::Json(serde_json::json!([
                        {"id": "3", "title": "Embroidery", "rating": 4.5}
                    ]))
                }),
            );
        let backend = client(&serve(app).await);

        assert!(backend.products(None).await.unwrap().is_empty());
        assert!(backend.categories(None).await.unwrap().is_empty());
        let services = backend.services(None).await.unwrap();
        assert_eq!(services[0].title, "Embroidery");
        assert_eq!(services[0].id.as_i64(), 3);
    }
}
