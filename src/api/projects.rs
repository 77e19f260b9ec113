use serde::{Deserialize, Serialize};

use crate::api::types::{deserialize_id, deserialize_id_list, UserRef};
use crate::api::{resource_path, ApiClient};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub team_members_names: Vec<String>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<UserRef>,
    #[serde(default)]
    pub uploaded_by_name: Option<String>,
}

impl ProjectDocument {
    pub fn uploader(&self) -> &str {
        self.uploaded_by_name
            .as_deref()
            .or(self.uploaded_by.as_ref().map(|u| u.name.as_str()))
            .unwrap_or("")
    }
}

/// Status code to French display label.
pub fn status_label(status: &str) -> &str {
    match status {
        "active" | "in_progress" => "En cours",
        "completed" => "Terminé",
        "planning" => "En préparation",
        "on_hold" | "paused" => "En pause",
        other => other,
    }
}

pub fn priority_label(priority: &str) -> &str {
    match priority {
        "high" => "Haute",
        "medium" => "Moyenne",
        "low" => "Basse",
        other => other,
    }
}

impl ApiClient {
    pub async fn list_public_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/api/projects/").await
    }

    pub async fn list_project_documents(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectDocument>, ApiError> {
        self.get_json(&resource_path("/api/projects", project_id, "documents/")?)
            .await
    }
}
