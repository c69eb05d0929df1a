//! Content endpoints: sections, the about document, uploads.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use reshow_core::api_url::relativize_upload_url;
use reshow_core::content::{AboutDocument, SectionContent, SectionId, as_content};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::{ApiError, BackendClient};

/// An image submitted through an upload control.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Message shown when an upload fails.
#[must_use]
pub fn upload_failure_message(err: &ApiError) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    match err {
        ApiError::Unauthorized => "Authentication failed. Please log in again.".to_string(),
        ApiError::BadRequest { .. } => {
            "Invalid file. Please check the file size and format.".to_string()
        }
        _ => "Failed to upload image. Please try again.".to_string(),
    }
}

impl BackendClient {
    /// Public content of one section (`GET /content/:section`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token), fields(section = %section))]
    pub async fn section(
        &self,
        section: SectionId,
        token: Option<&SecretString>,
    ) -> Result<SectionContent, ApiError> {
        let value: Value = self
            .get(&format!("/content/{}", section.as_str()), token)
            .await?;
        Ok(as_content(Some(&value)))
    }

    /// The composite about document (`GET /about`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn about(&self, token: Option<&SecretString>) -> Result<Value, ApiError> {
        self.get("/about", token).await
    }

    /// Replace the about document (`PUT /about`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn save_about(
        &self,
        token: &SecretString,
        document: &AboutDocument,
    ) -> Result<(), ApiError> {
        self.put("/about", Some(token), document).await
    }

    /// Services page header (`GET /services-content`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn services_page(
        &self,
        token: Option<&SecretString>,
    ) -> Result<SectionContent, ApiError> {
        let value: Value = self.get("/services-content", token).await?;
        Ok(as_content(Some(&value)))
    }

    /// Every saved override, keyed by section id (`GET /admin/content`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn saved_content(&self, token: &SecretString) -> Result<SectionContent, ApiError> {
        let value: Value = self.get("/admin/content", Some(token)).await?;
        Ok(as_content(Some(&value)))
    }

    /// Save one section's override (`PUT /admin/content/:section`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token, content), fields(section = %section))]
    pub async fn save_section(
        &self,
        token: &SecretString,
        section: SectionId,
        content: &SectionContent,
    ) -> Result<(), ApiError> {
        self.put(
            &format!("/admin/content/{}", section.as_str()),
            Some(token),
            content,
        )
        .await
    }

    /// Upload an image (`POST /admin/upload`) and return its stored path.
    ///
    /// `upload_type` tells the backend where to file it (`content`,
    /// `products`). Paths echoing the backend's own origin come back
    /// relative.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected or the request fails.
    #[instrument(skip(self, token, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_image(
        &self,
        token: &SecretString,
        file: UploadFile,
        upload_type: &str,
    ) -> Result<String, ApiError> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("image", part)
            .text("uploadType", upload_type.to_string());

        // No explicit Content-Type: reqwest adds the multipart boundary.
        let builder = self
            .request(Method::POST, "/admin/upload", Some(token))
            .multipart(form);
        let response: UploadResponse = self.send(builder).await?;
        Ok(relativize_upload_url(&response.url, self.base_url()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::extract::Multipart;
    use axum::routing::post;

    use super::super::tests::{client, serve};
    use super::*;

    #[test]
    fn test_upload_failure_messages() {
        assert_eq!(
            upload_failure_message(&ApiError::from_response(400, r#"{"error":"File too large"}"#)),
            "File too large"
        );
        assert_eq!(
            upload_failure_message(&ApiError::Unauthorized),
            "Authentication failed. Please log in again."
        );
        assert_eq!(
            upload_failure_message(&ApiError::from_response(400, "")),
            "Invalid file. Please check the file size and format."
        );
        assert_eq!(
            upload_failure_message(&ApiError::Server { status: 500 }),
            "Failed to upload image. Please try again."
        );
    }

    #[tokio::test]
    async fn test_upload_sends_image_and_type() {
        let app = Router::new().route(
            "/api/admin/upload",
            post(|mut multipart: Multipart| async move {
                let mut upload_type = String::new();
                let mut file_name = String::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    match field.name() {
                        Some("uploadType") => upload_type = field.text().await.unwrap(),
                        Some("image") => {
                            file_name = field.file_name().unwrap_or_default().to_string();
                        }
                        _ => {}
                    }
                }
                axum::Json(serde_json::json!({
                    "url": format!("/uploads/{upload_type}/{file_name}")
                }))
            }),
        );
        let backend = client(&serve(app).await);
        let token = SecretString::from("t".to_string());

        let url = backend
            .upload_image(
                &token,
                UploadFile {
                    file_name: "logo.png".to_string(),
                    content_type: Some("image/png".to_string()),
                    bytes: vec![0x89, 0x50, 0x4e, 0x47],
                },
                "content",
            )
            .await
            .unwrap();
        assert_eq!(url, "/uploads/content/logo.png");
    }
}
