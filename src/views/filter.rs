use crate::api::publications::{Publication, PublicationCategory};

/// Client-side publication filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationFilter {
    pub query: String,
    pub category: Option<PublicationCategory>,
    pub year: Option<i32>,
}

impl PublicationFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.category.is_none() && self.year.is_none()
    }

    /// Case-insensitive substring match of the query over title, abstract,
    /// author names and keywords, plus exact category and year matches.
    pub fn matches(&self, publication: &Publication) -> bool {
        if let Some(category) = self.category {
            if publication.category != Some(category) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if publication.year() != Some(year) {
                return false;
            }
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let contains = |text: &str| text.to_lowercase().contains(&query);
        contains(&publication.title)
            || contains(&publication.abstract_text)
            || publication.author_names().into_iter().any(contains)
            || publication.keywords.iter().any(|k| contains(k))
    }
}
