use crate::api::files::{format_file_size, FileRecord};
use crate::api::ApiClient;
use crate::auth::models::User;
use crate::error::ApiError;
use crate::views::{RequestGeneration, Ticket};

#[derive(Debug, Default)]
pub struct FilesView {
    items: Vec<FileRecord>,
    generation: RequestGeneration,
}

impl FilesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.generation.begin()
    }

    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vec<FileRecord>, ApiError>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.items = result.unwrap_or_else(|e| {
            tracing::warn!("Failed to load files: {}", e);
            Vec::new()
        });
        true
    }

    pub async fn load(&mut self, api: &ApiClient) {
        let ticket = self.begin_load();
        let result = api.list_files().await;
        self.finish_load(ticket, result);
    }

    pub fn items(&self) -> &[FileRecord] {
        &self.items
    }

    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|f| f.size).sum()
    }

    pub fn total_size_label(&self) -> String {
        format_file_size(self.total_size())
    }

    /// Only the uploader may delete a file.
    pub fn can_delete(&self, id: &str, user: Option<&User>) -> bool {
        let Some(user) = user else {
            return false;
        };
        self.items
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| f.uploaded_by.as_ref())
            .map(|owner| owner.id == user.id)
            .unwrap_or(false)
    }

    /// Record a freshly uploaded file at the top of the list.
    pub fn push_uploaded(&mut self, record: FileRecord) {
        self.generation.invalidate();
        self.items.insert(0, record);
    }

    /// Drop a file the backend confirmed deleted. Supersedes any load in
    /// flight.
    pub fn remove_local(&mut self, id: &str) -> bool {
        self.generation.invalidate();
        let before = self.items.len();
        self.items.retain(|f| f.id != id);
        self.items.len() != before
    }

    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> Result<(), ApiError> {
        api.delete_file(id).await?;
        self.remove_local(id);
        tracing::info!(id, "File deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::BackendUser;
    use chrono::Utc;

    fn files() -> Vec<FileRecord> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "a.pdf", "file": "/media/a.pdf", "file_type": "pdf",
                 "size": 1024, "uploaded_by": {"id": 7, "name": "ana"}},
                {"id": 2, "name": "b.png", "file": "/media/b.png", "file_type": "png",
                 "size": 512}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn totals_and_ownership() {
        let mut view = FilesView::new();
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(files()));

        assert_eq!(view.total_size(), 1536);
        assert_eq!(view.total_size_label(), "1.5 KB");

        let payload: BackendUser = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        let owner = User::from_backend(&payload, Utc::now());
        assert!(view.can_delete("1", Some(&owner)));
        assert!(!view.can_delete("2", Some(&owner)));
        assert!(!view.can_delete("1", None));
    }

    #[test]
    fn failed_load_is_empty() {
        let mut view = FilesView::new();
        let ticket = view.begin_load();
        view.finish_load(ticket, Err(ApiError::Decode("bad".into())));
        assert!(view.items().is_empty());
        assert_eq!(view.total_size_label(), "0 Bytes");
    }

    #[test]
    fn local_changes_supersede_load_in_flight() {
        let mut view = FilesView::new();
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(files()));

        let in_flight = view.begin_load();
        assert!(view.remove_local("1"));
        assert!(!view.finish_load(in_flight, Ok(files())));
        assert_eq!(view.items().len(), 1);
        assert_eq!(view.items()[0].id, "2");

        let in_flight = view.begin_load();
        view.push_uploaded(files().remove(0));
        assert!(!view.finish_load(in_flight, Ok(Vec::new())));
        assert_eq!(view.items().len(), 2);
    }
}
