use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::{
    MediaItem, Report, ReportPriority, ReportStatus, TimelineEntry,
};
use crate::features::reports::policy;

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub contact_info: Option<String>,
    pub priority: ReportPriority,
    pub status: ReportStatus,
    pub assigned_to: Option<String>,
    pub assigned_user_name: Option<String>,
    pub media: Vec<MediaItem>,
    pub timeline: Vec<TimelineEntry>,
    /// Whether the citizen may still edit this report
    pub can_edit: bool,
    /// Whether the citizen may still delete this report
    pub can_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            can_edit: policy::can_edit(r.status),
            can_delete: policy::can_delete(r.status),
            id: r.id,
            user_id: r.user_id,
            category: r.category,
            title: r.title,
            description: r.description,
            location: r.location,
            contact_info: r.contact_info,
            priority: r.priority,
            status: r.status,
            assigned_to: r.assigned_to,
            assigned_user_name: r.assigned_user_name,
            media: r.media,
            timeline: r.timeline,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Request DTO for submitting a new report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    #[validate(length(min = 1, max = 128, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Location must not exceed 500 characters"))]
    pub location: Option<String>,

    pub priority: Option<ReportPriority>,

    #[validate(length(max = 200, message = "Contact info must not exceed 200 characters"))]
    pub contact_info: Option<String>,

    #[serde(default)]
    pub media: Vec<MediaItem>,
}

/// Request DTO for a citizen editing their report.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Location must not exceed 500 characters"))]
    pub location: Option<String>,

    /// Blank clears the contact info
    #[validate(length(max = 200, message = "Contact info must not exceed 200 characters"))]
    pub contact_info: Option<String>,

    /// Replaces the media list
    pub media: Option<Vec<MediaItem>>,
}

/// Request DTO for changing report status (admin)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Request DTO for assigning a report to a department user (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignReportDto {
    #[validate(length(min = 1, message = "Assignee id is required"))]
    pub assignee_id: String,

    #[validate(length(min = 1, max = 128, message = "Assignee name must be 1-128 characters"))]
    pub assignee_name: String,
}

/// Request DTO for moving a report to another department (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangeDepartmentDto {
    #[validate(length(min = 1, max = 128, message = "Department must be 1-128 characters"))]
    pub department: String,
}
