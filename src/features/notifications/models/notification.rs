use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::ReportStatus;
use crate::shared::constants::{
    NOTIFY_REPORT_SUBMITTED_MESSAGE, NOTIFY_REPORT_SUBMITTED_TITLE, NOTIFY_REPORT_UPDATE_MESSAGE,
    NOTIFY_REPORT_UPDATE_TITLE,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Document model for the `notifications` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    /// Translation key for the title
    pub title_key: String,
    /// Translation key for the body
    pub message_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_key: Option<ReportStatus>,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub title_key: String,
    pub message_key: String,
    pub status_key: Option<ReportStatus>,
    pub kind: NotificationKind,
    pub report_id: Option<String>,
}

impl NewNotification {
    /// Sent to the citizen right after a report is filed
    pub fn report_submitted(user_id: &str, report_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            title_key: NOTIFY_REPORT_SUBMITTED_TITLE.to_string(),
            message_key: NOTIFY_REPORT_SUBMITTED_MESSAGE.to_string(),
            status_key: None,
            kind: NotificationKind::Success,
            report_id: Some(report_id.to_string()),
        }
    }

    /// Sent to the report owner when an admin changes the status
    pub fn report_status_changed(user_id: &str, report_id: &str, status: ReportStatus) -> Self {
        Self {
            user_id: user_id.to_string(),
            title_key: NOTIFY_REPORT_UPDATE_TITLE.to_string(),
            message_key: NOTIFY_REPORT_UPDATE_MESSAGE.to_string(),
            status_key: Some(status),
            kind: NotificationKind::Info,
            report_id: Some(report_id.to_string()),
        }
    }

    pub fn into_notification(self, id: String, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            title_key: self.title_key,
            message_key: self.message_key,
            status_key: self.status_key,
            kind: self.kind,
            report_id: self.report_id,
            read: false,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_update_notification_shape() {
        let n = NewNotification::report_status_changed("u1", "r1", ReportStatus::InProgress)
            .into_notification("n1".into(), Utc::now());

        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["titleKey"], json!("reportUpdate"));
        assert_eq!(value["messageKey"], json!("reportStatusUpdateMsg"));
        assert_eq!(value["statusKey"], json!("inProgress"));
        assert_eq!(value["type"], json!("info"));
        assert_eq!(value["reportId"], json!("r1"));
        assert_eq!(value["read"], json!(false));
    }

    #[test]
    fn test_submitted_notification_is_success_without_status() {
        let n = NewNotification::report_submitted("u1", "r1");
        assert_eq!(n.kind, NotificationKind::Success);
        assert!(n.status_key.is_none());
        assert_eq!(n.title_key, "reportSubmitted");
    }
}
