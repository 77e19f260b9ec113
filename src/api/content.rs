use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::ApiClient;
use crate::error::ApiError;

/// Binary logo uploaded alongside a content update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl LogoAsset {
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".to_string());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

/// Text form of a payload value for a multipart field.
fn form_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ApiClient {
    /// The flat, snake_case site-content document.
    pub async fn get_site_content(&self) -> Result<Map<String, Value>, ApiError> {
        self.get_json("/api/site-content/").await
    }

    pub async fn put_site_content(&self, payload: &Map<String, Value>) -> Result<(), ApiError> {
        let builder = self.request(Method::PUT, "/api/site-content/")?.json(payload);
        self.send(builder).await?;
        Ok(())
    }

    /// Same update as [`put_site_content`](Self::put_site_content) but as
    /// form data, with the logo in a `logo_image` part.
    pub async fn put_site_content_multipart(
        &self,
        payload: &Map<String, Value>,
        logo: LogoAsset,
    ) -> Result<(), ApiError> {
        let mut form = Form::new();
        for (key, value) in payload {
            if let Some(text) = form_text(value) {
                form = form.text(key.clone(), text);
            }
        }

        tracing::info!(name = %logo.file_name, size = logo.bytes.len(), "Uploading logo");
        let part = Part::bytes(logo.bytes)
            .file_name(logo.file_name)
            .mime_str(&logo.mime)?;
        form = form.part("logo_image", part);

        let builder = self
            .request(Method::PUT, "/api/site-content/")?
            .multipart(form);
        self.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_text_stringifies_scalars() {
        assert_eq!(form_text(&json!("Accueil")).as_deref(), Some("Accueil"));
        assert_eq!(form_text(&json!(28)).as_deref(), Some("28"));
        assert_eq!(form_text(&Value::Null), None);
    }

    #[tokio::test]
    async fn logo_asset_guesses_mime() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logo.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let logo = LogoAsset::from_path(&path).await.unwrap();
        assert_eq!(logo.file_name, "logo.png");
        assert_eq!(logo.mime, "image/png");
        assert_eq!(logo.bytes.len(), 4);
    }
}
