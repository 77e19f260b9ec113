use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::types::{deserialize_id, UserRef};
use crate::api::{read_json, resource_path, ApiClient};
use crate::error::ApiError;

/// A file shared by a lab member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Absolute URL or `/media/...` path of the stored file.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded_by: Option<UserRef>,
}

impl ApiClient {
    pub async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        self.get_json("/api/files/").await
    }

    /// Upload a local file as multipart form data (`file` part plus `name`
    /// field).
    pub async fn upload_file(&self, path: &Path) -> Result<FileRecord, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        tracing::info!(name = %name, size = bytes.len(), "Uploading file");

        let part = Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new().part("file", part).text("name", name);

        let response = self
            .send(self.request(Method::POST, "/api/files/")?.multipart(form))
            .await?;
        read_json(response).await
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&resource_path("/api/files", id, "")?).await
    }

    /// Fetch a file's bytes. `file` may be an absolute URL or a media path.
    pub async fn download_file(&self, file: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve_media(file);
        let response = self.send(self.request_url(Method::GET, &url)?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub fn file_url(&self, path: &str) -> String {
        self.resolve_media(path)
    }

    pub fn file_download_url(&self, id: &str) -> Result<String, ApiError> {
        Ok(self.resolve_media(&resource_path("/api/files", id, "download/")?))
    }
}

/// Human-readable size using 1024-based units, two decimals at most and no
/// trailing zeros ("1.5 KB", "2 MB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_file_size_units() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
    }

    #[test]
    fn file_record_accepts_backend_shape() {
        let record: FileRecord = serde_json::from_str(
            r#"{
                "id": 12,
                "name": "rapport.pdf",
                "file": "/media/user_files/rapport.pdf",
                "uploaded_at": "2024-05-02T10:00:00Z",
                "file_type": "pdf",
                "size": 2048,
                "uploaded_by": {"id": 3, "name": "alice"}
            }"#,
        )
        .unwrap();
        assert_eq!(record.id, "12");
        assert_eq!(record.uploaded_by.unwrap().id, "3");
    }
}
