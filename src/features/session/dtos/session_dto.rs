use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::departments::dtos::DepartmentResponseDto;
use crate::features::departments::models::Department;
use crate::features::notifications::dtos::NotificationResponseDto;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::session::services::{ReportStats, UserSession};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ReportStatsDto {
    pub total: usize,
    /// Pending and assigned reports
    pub pending: usize,
    pub resolved: usize,
}

impl From<ReportStats> for ReportStatsDto {
    fn from(s: ReportStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            resolved: s.resolved,
        }
    }
}

/// Everything a client needs after sign-in, in one payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshotDto {
    pub is_admin: bool,
    pub reports: Vec<ReportResponseDto>,
    pub notifications: Vec<NotificationResponseDto>,
    pub unread_notifications: usize,
    /// Active departments only
    pub departments: Vec<DepartmentResponseDto>,
    pub stats: ReportStatsDto,
    pub refreshed_at: DateTime<Utc>,
}

impl SessionSnapshotDto {
    pub fn new(session: UserSession, departments: Vec<Department>) -> Self {
        let stats = ReportStats::from_reports(&session.reports).into();
        let unread_notifications = session.notifications.iter().filter(|n| !n.read).count();

        Self {
            is_admin: session.is_admin,
            reports: session.reports.into_iter().map(|r| r.into()).collect(),
            notifications: session.notifications.into_iter().map(|n| n.into()).collect(),
            unread_notifications,
            departments: departments
                .into_iter()
                .filter(|d| d.is_active)
                .map(|d| d.into())
                .collect(),
            stats,
            refreshed_at: session.refreshed_at,
        }
    }
}
