use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::types::{deserialize_id, FileAttachment, UserRef};
use crate::api::{read_json, resource_path, ApiClient};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationCategory {
    Article,
    BookChapter,
    Memoire,
    Conference,
}

impl PublicationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationCategory::Article => "article",
            PublicationCategory::BookChapter => "book_chapter",
            PublicationCategory::Memoire => "memoire",
            PublicationCategory::Conference => "conference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PublicationCategory::Article => "Article",
            PublicationCategory::BookChapter => "Livre / Chapitre",
            PublicationCategory::Memoire => "Mémoire",
            PublicationCategory::Conference => "Conférence",
        }
    }
}

impl fmt::Display for PublicationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(PublicationCategory::Article),
            "book_chapter" | "book" | "chapter" => Ok(PublicationCategory::BookChapter),
            "memoire" | "thesis" => Ok(PublicationCategory::Memoire),
            "conference" => Ok(PublicationCategory::Conference),
            other => Err(format!("unknown publication category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedMember {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedExternal {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

pub type MemberSearchResult = TaggedMember;
pub type ExternalSearchResult = TaggedExternal;

/// A publication as returned by `/api/publications/`. Which optional fields
/// are set depends on the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub category: Option<PublicationCategory>,

    // Article
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,

    // Book / chapter
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub publication_place: Option<String>,
    #[serde(default)]
    pub publisher_name: Option<String>,

    // Memoire
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub thesis_year: Option<i32>,
    #[serde(default)]
    pub university: Option<String>,

    // Conference
    #[serde(default)]
    pub presentation_title: Option<String>,
    #[serde(default)]
    pub conference_title: Option<String>,
    #[serde(default)]
    pub conference_year: Option<i32>,
    #[serde(default)]
    pub conference_location: Option<String>,
    #[serde(default)]
    pub conference_pages: Option<String>,

    #[serde(default)]
    pub posted_by: Option<UserRef>,
    #[serde(default)]
    pub tagged_members: Vec<TaggedMember>,
    #[serde(default)]
    pub tagged_externals: Vec<TaggedExternal>,
    #[serde(default)]
    pub attached_files: Vec<FileAttachment>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Publication {
    /// The year that matters for this category.
    pub fn year(&self) -> Option<i32> {
        match self.category {
            Some(PublicationCategory::Article) | Some(PublicationCategory::BookChapter) => {
                self.publication_year
            }
            Some(PublicationCategory::Memoire) => self.thesis_year,
            Some(PublicationCategory::Conference) => self.conference_year,
            None => self
                .publication_year
                .or(self.thesis_year)
                .or(self.conference_year),
        }
    }

    /// Everyone credited on the record: poster, memoire author, tagged
    /// members and externals.
    pub fn author_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Some(posted_by) = &self.posted_by {
            names.push(posted_by.name.as_str());
        }
        if let Some(author) = &self.author_name {
            names.push(author.as_str());
        }
        names.extend(self.tagged_members.iter().map(|m| m.name.as_str()));
        names.extend(self.tagged_externals.iter().map(|e| e.name.as_str()));
        names.retain(|n| !n.is_empty());
        names
    }

    pub fn attachments_size(&self) -> u64 {
        self.attached_files.iter().map(|f| f.size).sum()
    }

    pub fn is_posted_by(&self, user_id: &str) -> bool {
        self.posted_by
            .as_ref()
            .map(|p| p.id == user_id)
            .unwrap_or(false)
    }
}

/// Body of a create or update call. Tagged members, externals and files are
/// referenced by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationDraft {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub category: Option<PublicationCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thesis_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thesis_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_pages: Option<String>,

    #[serde(default)]
    pub tagged_members: Vec<String>,
    #[serde(default)]
    pub tagged_externals: Vec<String>,
    #[serde(default)]
    pub attached_files: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ApiClient {
    pub async fn list_publications(&self) -> Result<Vec<Publication>, ApiError> {
        self.get_json("/api/publications/").await
    }

    pub async fn get_publication(&self, id: &str) -> Result<Publication, ApiError> {
        self.get_json(&resource_path("/api/publications", id, "")?).await
    }

    pub async fn create_publication(
        &self,
        draft: &PublicationDraft,
    ) -> Result<Publication, ApiError> {
        self.send_json(Method::POST, "/api/publications/", draft)
            .await
    }

    pub async fn update_publication(
        &self,
        id: &str,
        draft: &PublicationDraft,
    ) -> Result<Publication, ApiError> {
        self.send_json(
            Method::PUT,
            &resource_path("/api/publications", id, "")?,
            draft,
        )
        .await
    }

    pub async fn delete_publication(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&resource_path("/api/publications", id, "")?).await
    }

    pub async fn search_members(&self, query: &str) -> Result<Vec<MemberSearchResult>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/publications/search_members/")?
            .query(&[("q", query)]);
        read_json(self.send(builder).await?).await
    }

    pub async fn search_externals(
        &self,
        query: &str,
    ) -> Result<Vec<ExternalSearchResult>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/publications/search_externals/")?
            .query(&[("q", query)]);
        read_json(self.send(builder).await?).await
    }
}
