use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::departments::models::Department;

/// Response DTO for department
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponseDto {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Department> for DepartmentResponseDto {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            name: d.name,
            icon: d.icon,
            color: d.color,
            is_active: d.is_active,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Request DTO for creating a department
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub name: String,

    #[validate(length(max = 16, message = "Icon must not exceed 16 characters"))]
    pub icon: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::HEX_COLOR_REGEX",
        message = "Color must be a hex value like #22c55e"
    ))]
    pub color: Option<String>,
}

/// Request DTO for updating a department. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 16, message = "Icon must not exceed 16 characters"))]
    pub icon: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::HEX_COLOR_REGEX",
        message = "Color must be a hex value like #22c55e"
    ))]
    pub color: Option<String>,

    pub is_active: Option<bool>,
}
