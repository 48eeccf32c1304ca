use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    #[default]
    Citizen,
    DepartmentUser,
    Admin,
}

/// Presence shown to admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Active,
    Online,
    Offline,
    Disabled,
}

/// Document model for the `users` collection.
///
/// Citizens are keyed by phone number; department users by their auth id
/// or a generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub status: Option<PresenceStatus>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            uid: None,
            role,
            name: None,
            first_name: None,
            last_name: None,
            gender: None,
            phone: None,
            full_name: None,
            email: None,
            department_id: None,
            status: None,
            is_active: true,
            created_by: None,
            created_at: Some(Utc::now()),
            updated_at: None,
            last_active: None,
        }
    }
}
