use crate::api::publications::{ExternalSearchResult, MemberSearchResult};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::views::{RequestGeneration, Ticket};

/// Results of the latest lookup only. A slower answer to an earlier query
/// never replaces the answer to a later one.
#[derive(Debug)]
pub struct GuardedSearch<T> {
    query: String,
    results: Vec<T>,
    generation: RequestGeneration,
}

impl<T> Default for GuardedSearch<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            generation: RequestGeneration::new(),
        }
    }
}

impl<T> GuardedSearch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Start a lookup for `query`. A blank query clears the results and
    /// returns no ticket.
    pub fn begin(&mut self, query: &str) -> Option<Ticket> {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.results.clear();
            self.generation.invalidate();
            return None;
        }
        Some(self.generation.begin())
    }

    pub fn finish(&mut self, ticket: Ticket, result: Result<Vec<T>, ApiError>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.results = result.unwrap_or_else(|e| {
            tracing::warn!("Search failed: {}", e);
            Vec::new()
        });
        true
    }
}

/// Member and external-author lookups used when tagging a publication.
#[derive(Debug, Default)]
pub struct MemberSearch {
    pub members: GuardedSearch<MemberSearchResult>,
    pub externals: GuardedSearch<ExternalSearchResult>,
}

impl MemberSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn search_members(&mut self, api: &ApiClient, query: &str) {
        if let Some(ticket) = self.members.begin(query) {
            let result = api.search_members(query.trim()).await;
            self.members.finish(ticket, result);
        }
    }

    pub async fn search_externals(&mut self, api: &ApiClient, query: &str) {
        if let Some(ticket) = self.externals.begin(query) {
            let result = api.search_externals(query.trim()).await;
            self.externals.finish(ticket, result);
        }
    }
}
