use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::deserialize_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Staff and superusers administer the site; everyone else is a member.
    pub fn from_flags(is_staff: bool, is_superuser: bool) -> Self {
        if is_staff || is_superuser {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// The locally held user record. Built once per login from the backend
/// payload and only ever replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Never populated client-side.
    pub password: String,
    pub role: Role,
    pub status: UserStatus,
    pub verified: bool,
    pub last_login: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_backend(payload: &BackendUser, now: DateTime<Utc>) -> Self {
        Self {
            id: payload.id.clone(),
            email: payload.email.clone(),
            name: payload.username.clone(),
            password: String::new(),
            role: payload.role(),
            status: UserStatus::Active,
            verified: true,
            last_login: now,
            created_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User as serialised by the backend (`/api/user/` and the OAuth redirect).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
}

impl BackendUser {
    pub fn role(&self) -> Role {
        Role::from_flags(
            self.is_staff.unwrap_or(false),
            self.is_superuser.unwrap_or(false),
        )
    }
}

/// Access/refresh pair issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}
