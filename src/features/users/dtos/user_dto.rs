use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{PresenceStatus, User, UserRole};

/// Response DTO for a user profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PresenceStatus>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            uid: u.uid,
            role: u.role,
            name: u.name,
            first_name: u.first_name,
            last_name: u.last_name,
            gender: u.gender,
            phone: u.phone,
            full_name: u.full_name,
            email: u.email,
            department_id: u.department_id,
            status: u.status,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_active: u.last_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserExistsResponseDto {
    pub exists: bool,
}

/// Request DTO for citizen sign-up. The document id is the phone number.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCitizenDto {
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone must be 7-15 digits with an optional leading +"
    ))]
    pub phone: String,

    #[validate(length(max = 64, message = "First name must not exceed 64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 64, message = "Last name must not exceed 64 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 32, message = "Gender must not exceed 32 characters"))]
    pub gender: Option<String>,
}

/// Request DTO for updating the caller's own profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(max = 128, message = "Name must not exceed 128 characters"))]
    pub name: Option<String>,

    /// Contact number shown on the profile. Report ownership never follows it.
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone must be 7-15 digits with an optional leading +"
    ))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUserQuery {
    /// Only users of this department
    pub department_id: Option<String>,
}

/// Request DTO for creating a department user (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentUserDto {
    #[validate(length(min = 1, max = 128, message = "Full name must be 1-128 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Department is required"))]
    pub department_id: String,

    /// Auth id of an existing account to bind this profile to
    pub uid: Option<String>,
}

/// Request DTO for updating a department user (admin). Blank values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentUserDto {
    #[validate(length(max = 128, message = "Full name must not exceed 128 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,

    pub department_id: Option<String>,

    pub status: Option<PresenceStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetUserActiveDto {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePresenceDto {
    pub status: PresenceStatus,
}
