use crate::api::publications::{Publication, PublicationCategory};
use crate::api::ApiClient;
use crate::auth::models::User;
use crate::error::ApiError;
use crate::views::filter::PublicationFilter;
use crate::views::{paginate, Page, RequestGeneration, Ticket};

pub const EMPTY_MESSAGE: &str = "Aucune publication trouvée";

#[derive(Debug, Default)]
pub struct PublicationsView {
    items: Vec<Publication>,
    filter: PublicationFilter,
    generation: RequestGeneration,
    loaded: bool,
}

impl PublicationsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.generation.begin()
    }

    /// Apply a fetch result. A failure leaves an empty list. Returns false
    /// when the ticket was superseded and the result dropped.
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Publication>, ApiError>,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("Dropping stale publications response");
            return false;
        }
        self.items = match result {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to load publications: {}", e);
                Vec::new()
            }
        };
        self.loaded = true;
        true
    }

    pub async fn load(&mut self, api: &ApiClient) {
        let ticket = self.begin_load();
        let result = api.list_publications().await;
        self.finish_load(ticket, result);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn items(&self) -> &[Publication] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Publication> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn filter(&self) -> &PublicationFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: PublicationFilter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&Publication> {
        self.items
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    pub fn page(&self, number: usize, per_page: usize) -> Page<&Publication> {
        paginate(self.visible(), number, per_page)
    }

    /// Categories present in the loaded list, in declaration order.
    pub fn categories(&self) -> Vec<PublicationCategory> {
        let mut categories: Vec<_> = self.items.iter().filter_map(|p| p.category).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Years present in the loaded list, newest first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<_> = self.items.iter().filter_map(Publication::year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        if self.loaded && self.visible().is_empty() {
            Some(EMPTY_MESSAGE)
        } else {
            None
        }
    }

    /// Only the poster may delete a publication.
    pub fn can_delete(&self, id: &str, user: Option<&User>) -> bool {
        match (self.get(id), user) {
            (Some(publication), Some(user)) => publication.is_posted_by(&user.id),
            _ => false,
        }
    }

    /// Drop an item from local state. Used once the backend confirmed the
    /// delete. A load still in flight was issued before the delete and is
    /// superseded, so it cannot bring the item back.
    pub fn remove_local(&mut self, id: &str) -> bool {
        self.generation.invalidate();
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        self.items.len() != before
    }

    /// Delete remotely, then locally. On failure the list is untouched.
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> Result<(), ApiError> {
        api.delete_publication(id).await?;
        self.remove_local(id);
        tracing::info!(id, "Publication deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::BackendUser;
    use chrono::Utc;

    fn publications() -> Vec<Publication> {
        serde_json::from_str(
            r#"[
                {"id": 1, "title": "Alpha", "abstract": "", "category": "article",
                 "publication_year": 2021, "posted_by": {"id": 10, "name": "Ana"}},
                {"id": 2, "title": "Beta", "abstract": "", "category": "conference",
                 "conference_year": 2023, "posted_by": {"id": 11, "name": "Ben"}},
                {"id": 3, "title": "Gamma", "abstract": "", "category": "article",
                 "publication_year": 2023}
            ]"#,
        )
        .unwrap()
    }

    fn loaded() -> PublicationsView {
        let mut view = PublicationsView::new();
        let ticket = view.begin_load();
        assert!(view.finish_load(ticket, Ok(publications())));
        view
    }

    fn user(id: u32) -> User {
        let payload: BackendUser = serde_json::from_str(&format!(r#"{{"id": {}}}"#, id)).unwrap();
        User::from_backend(&payload, Utc::now())
    }

    #[test]
    fn failed_load_shows_empty_state() {
        let mut view = PublicationsView::new();
        assert_eq!(view.empty_message(), None);

        let ticket = view.begin_load();
        view.finish_load(
            ticket,
            Err(ApiError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "oops".into(),
            }),
        );
        assert!(view.items().is_empty());
        assert_eq!(view.empty_message(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut view = PublicationsView::new();
        let old = view.begin_load();
        let new = view.begin_load();

        assert!(view.finish_load(new, Ok(publications())));
        assert!(!view.finish_load(old, Ok(Vec::new())));
        assert_eq!(view.items().len(), 3);
    }

    #[test]
    fn categories_and_years_are_derived() {
        let view = loaded();
        assert_eq!(
            view.categories(),
            vec![PublicationCategory::Article, PublicationCategory::Conference]
        );
        assert_eq!(view.years(), vec![2023, 2021]);
    }

    #[test]
    fn filter_and_page() {
        let mut view = loaded();
        view.set_filter(PublicationFilter {
            year: Some(2023),
            ..Default::default()
        });
        let page = view.page(1, 1);
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items[0].id, "2");

        view.set_filter(PublicationFilter {
            query: "zeta".into(),
            ..Default::default()
        });
        assert_eq!(view.empty_message(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn only_poster_can_delete() {
        let view = loaded();
        assert!(view.can_delete("1", Some(&user(10))));
        assert!(!view.can_delete("1", Some(&user(11))));
        assert!(!view.can_delete("3", Some(&user(10))));
        assert!(!view.can_delete("1", None));
    }

    #[test]
    fn remove_local_drops_item() {
        let mut view = loaded();
        assert!(view.remove_local("2"));
        assert!(view.get("2").is_none());
        assert!(!view.remove_local("2"));
    }

    #[test]
    fn load_started_before_delete_cannot_restore_item() {
        let mut view = loaded();
        let in_flight = view.begin_load();

        assert!(view.remove_local("1"));
        assert!(!view.finish_load(in_flight, Ok(publications())));
        assert!(view.get("1").is_none());
        assert_eq!(view.items().len(), 2);

        let ticket = view.begin_load();
        assert!(view.finish_load(ticket, Ok(publications())));
        assert!(view.get("1").is_some());
    }
}
