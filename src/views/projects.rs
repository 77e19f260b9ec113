use crate::api::projects::{Project, ProjectDocument};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::views::{RequestGeneration, Ticket};

/// Public project list with a click-to-expand detail whose documents are
/// fetched lazily on selection.
#[derive(Debug, Default)]
pub struct ProjectsView {
    items: Vec<Project>,
    query: String,
    list_generation: RequestGeneration,
    selected: Option<String>,
    documents: Vec<ProjectDocument>,
    documents_loading: bool,
    documents_generation: RequestGeneration,
}

impl ProjectsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.list_generation.begin()
    }

    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vec<Project>, ApiError>) -> bool {
        if !self.list_generation.is_current(ticket) {
            return false;
        }
        self.items = result.unwrap_or_else(|e| {
            tracing::warn!("Failed to load projects: {}", e);
            Vec::new()
        });
        true
    }

    pub async fn load(&mut self, api: &ApiClient) {
        let ticket = self.begin_load();
        let result = api.list_public_projects().await;
        self.finish_load(ticket, result);
    }

    pub fn items(&self) -> &[Project] {
        &self.items
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Projects whose title or description contains the query.
    pub fn visible(&self) -> Vec<&Project> {
        let query = self.query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.title.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn selected(&self) -> Option<&Project> {
        let id = self.selected.as_deref()?;
        self.items.iter().find(|p| p.id == id)
    }

    pub fn documents(&self) -> &[ProjectDocument] {
        &self.documents
    }

    pub fn documents_loading(&self) -> bool {
        self.documents_loading
    }

    /// Select a project and start loading its documents. Any previous
    /// selection's pending documents are superseded.
    pub fn begin_select(&mut self, id: &str) -> Ticket {
        self.selected = Some(id.to_string());
        self.documents.clear();
        self.documents_loading = true;
        self.documents_generation.begin()
    }

    pub fn finish_select(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<ProjectDocument>, ApiError>,
    ) -> bool {
        if !self.documents_generation.is_current(ticket) {
            tracing::debug!("Dropping documents of a superseded selection");
            return false;
        }
        self.documents = result.unwrap_or_else(|e| {
            tracing::warn!("Failed to load project documents: {}", e);
            Vec::new()
        });
        self.documents_loading = false;
        true
    }

    pub async fn select(&mut self, api: &ApiClient, id: &str) {
        let ticket = self.begin_select(id);
        let result = api.list_project_documents(id).await;
        self.finish_select(ticket, result);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.documents.clear();
        self.documents_loading = false;
        self.documents_generation.invalidate();
    }
}
