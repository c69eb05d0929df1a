//! Multipart admin forms with image uploads.
//!
//! Editor and catalog forms are posted as `multipart/form-data`. A file
//! input named `upload:<target>` uploads its image first; the stored path
//! then replaces the text input `<target>`.

use axum::extract::Multipart;
use secrecy::SecretString;

use crate::backend::{BackendClient, UploadFile, upload_failure_message};
use crate::error::AppError;

const UPLOAD_PREFIX: &str = "upload:";

/// Text inputs and chosen files of one submitted form.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    fields: Vec<(String, String)>,
    uploads: Vec<(String, UploadFile)>,
}

impl SubmittedForm {
    /// Read every part of the request.
    ///
    /// File inputs left empty are skipped.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the body is not valid multipart.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if let Some(target) = name.strip_prefix(UPLOAD_PREFIX) {
                let target = target.to_string();
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if file_name.is_empty() || bytes.is_empty() {
                    continue;
                }
                form.uploads.push((
                    target,
                    UploadFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                ));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.push((name, value));
            }
        }
        Ok(form)
    }

    /// Last value submitted for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last value for `name`, or empty.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Every text input, in submission order.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Upload every chosen file and point its target input at the result.
    ///
    /// Stops at the first failure; the failed target keeps its old value.
    ///
    /// # Errors
    ///
    /// Returns the message to show for the failed upload.
    pub async fn upload_images(
        &mut self,
        backend: &BackendClient,
        token: &SecretString,
        upload_type: &str,
    ) -> Result<(), UploadFailure> {
        for (target, file) in std::mem::take(&mut self.uploads) {
            match backend.upload_image(token, file, upload_type).await {
                Ok(url) => {
                    tracing::info!(target = %target, url = %url, "Image uploaded");
                    self.fields.push((target, url));
                }
                Err(e) => {
                    tracing::error!("Failed to upload image: {e}");
                    return Err(UploadFailure {
                        message: upload_failure_message(&e),
                        unauthorized: e.is_unauthorized(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A rejected upload.
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub message: String,
    pub unauthorized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let form = SubmittedForm {
            fields: vec![
                ("f.image".to_string(), "/images/old.jpg".to_string()),
                ("action".to_string(), "save".to_string()),
                ("f.image".to_string(), "/uploads/content/new.jpg".to_string()),
            ],
            uploads: Vec::new(),
        };
        assert_eq!(form.get("f.image"), Some("/uploads/content/new.jpg"));
        assert_eq!(form.text("missing"), "");
        assert_eq!(form.inputs().count(), 3);
    }
}
