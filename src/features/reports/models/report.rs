use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Report lifecycle status.
///
/// Serialized in exactly one canonical form (`pending`, `assigned`,
/// `inProgress`, `resolved`, `closed`); any other spelling is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ReportStatus {
    Pending,
    Assigned,
    InProgress,
    Resolved,
    Closed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::Pending,
        ReportStatus::Assigned,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Assigned => "assigned",
            ReportStatus::InProgress => "inProgress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Closed => "closed",
        }
    }

    /// Human-readable label, used in timeline notes
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Assigned => "Assigned",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown report status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Reference to an uploaded photo or video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaItem {
    pub uri: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// One audit-trail entry. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub note: String,
    pub status: ReportStatus,
}

impl TimelineEntry {
    pub fn new(note: impl Into<String>, status: ReportStatus) -> Self {
        Self {
            date: Utc::now(),
            note: note.into(),
            status,
        }
    }
}

/// Document model for the `reports` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub priority: ReportPriority,
    pub status: ReportStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub assigned_user_name: Option<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_canonical_serialization() {
        assert_eq!(
            serde_json::to_value(ReportStatus::InProgress).unwrap(),
            json!("inProgress")
        );
        for status in ReportStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, json!(status.as_str()));
            assert_eq!(status.as_str().parse::<ReportStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_rejects_non_canonical_spellings() {
        for raw in ["Pending", "In Progress", "in_progress", "inprogress", ""] {
            assert!(raw.parse::<ReportStatus>().is_err(), "accepted {:?}", raw);
            assert!(serde_json::from_value::<ReportStatus>(json!(raw)).is_err());
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ReportStatus::InProgress.label(), "In Progress");
        assert_eq!(ReportStatus::Closed.to_string(), "closed");
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(ReportPriority::default(), ReportPriority::Medium);
        assert_eq!(
            serde_json::to_value(ReportPriority::High).unwrap(),
            json!("High")
        );
    }

    #[test]
    fn test_report_decodes_with_missing_optional_fields() {
        let report: Report = serde_json::from_value(json!({
            "id": "r1",
            "userId": "u1",
            "category": "Water",
            "title": "Leak",
            "location": "Main St",
            "status": "pending",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(report.priority, ReportPriority::Medium);
        assert!(report.media.is_empty());
        assert!(report.timeline.is_empty());
        assert_eq!(report.description, "");
    }
}
