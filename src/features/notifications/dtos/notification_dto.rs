use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::notifications::models::{Notification, NotificationKind};
use crate::features::reports::models::ReportStatus;

/// Response DTO for notification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponseDto {
    pub id: String,
    pub title_key: String,
    pub message_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_key: Option<ReportStatus>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponseDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title_key: n.title_key,
            message_key: n.message_key,
            status_key: n.status_key,
            kind: n.kind,
            report_id: n.report_id,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponseDto {
    /// Number of notifications that were unread
    pub updated: usize,
}
