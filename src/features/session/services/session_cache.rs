use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::departments::models::Department;
use crate::features::departments::services::DepartmentService;
use crate::features::notifications::models::Notification;
use crate::features::notifications::services::NotificationService;
use crate::features::reports::models::{Report, ReportStatus};
use crate::features::reports::services::ReportService;

/// Cached view of one signed-in user
#[derive(Debug, Clone)]
pub struct UserSession {
    /// Ids the user's documents may be stored under
    pub owner_ids: Vec<String>,
    pub is_admin: bool,
    /// Own reports, newest first
    pub reports: Vec<Report>,
    /// Own notifications, newest first
    pub notifications: Vec<Notification>,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub total: usize,
    /// Pending and assigned reports
    pub pending: usize,
    pub resolved: usize,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        reports.iter().fold(Self::default(), |mut stats, report| {
            stats.total += 1;
            match report.status {
                ReportStatus::Pending | ReportStatus::Assigned => stats.pending += 1,
                ReportStatus::Resolved => stats.resolved += 1,
                ReportStatus::InProgress | ReportStatus::Closed => {}
            }
            stats
        })
    }
}

/// Per-user report and notification state, plus the shared department list.
///
/// Entries are replaced wholesale on refresh and patched after successful
/// writes. A failed write never touches the cache.
pub struct SessionCache {
    reports: Arc<ReportService>,
    notifications: Arc<NotificationService>,
    departments: Arc<DepartmentService>,
    sessions: RwLock<HashMap<String, UserSession>>,
    department_list: RwLock<Vec<Department>>,
}

impl SessionCache {
    pub fn new(
        reports: Arc<ReportService>,
        notifications: Arc<NotificationService>,
        departments: Arc<DepartmentService>,
    ) -> Self {
        Self {
            reports,
            notifications,
            departments,
            sessions: RwLock::new(HashMap::new()),
            department_list: RwLock::new(Vec::new()),
        }
    }

    /// Reload the user's reports and notifications under both the auth id
    /// and the phone id
    pub async fn refresh(&self, user: &AuthenticatedUser) -> Result<UserSession> {
        let owner_ids = user.owner_ids();
        let (reports, notifications) = tokio::try_join!(
            self.reports.list_for_owner_ids(&owner_ids),
            self.notifications.list_for_owner_ids(&owner_ids),
        )?;

        let session = UserSession {
            owner_ids: owner_ids.iter().map(|id| id.to_string()).collect(),
            is_admin: user.is_admin(),
            reports,
            notifications,
            refreshed_at: Utc::now(),
        };

        self.sessions
            .write()
            .await
            .insert(user.session_key().to_string(), session.clone());

        tracing::debug!(
            "Session refreshed for {}: {} reports, {} notifications",
            user.uid,
            session.reports.len(),
            session.notifications.len()
        );

        Ok(session)
    }

    /// Cached entry, loaded on first access
    pub async fn snapshot(&self, user: &AuthenticatedUser) -> Result<UserSession> {
        if let Some(session) = self.sessions.read().await.get(user.session_key()) {
            return Ok(session.clone());
        }
        self.refresh(user).await
    }

    /// Drop the user's entry (logout)
    pub async fn invalidate(&self, user: &AuthenticatedUser) {
        self.sessions.write().await.remove(user.session_key());
    }

    pub async fn refresh_departments(&self) -> Result<Vec<Department>> {
        let departments = self.departments.list_all().await?;
        *self.department_list.write().await = departments.clone();
        Ok(departments)
    }

    /// Shared department list, loaded on first access
    pub async fn departments(&self) -> Result<Vec<Department>> {
        {
            let cached = self.department_list.read().await;
            if !cached.is_empty() {
                return Ok(cached.clone());
            }
        }
        self.refresh_departments().await
    }

    pub async fn stats(&self, user: &AuthenticatedUser) -> Result<ReportStats> {
        let session = self.snapshot(user).await?;
        Ok(ReportStats::from_reports(&session.reports))
    }

    pub async fn insert_report(&self, user: &AuthenticatedUser, report: Report) {
        self.patch(user, |session| {
            session.reports.retain(|r| r.id != report.id);
            session.reports.insert(0, report);
        })
        .await;
    }

    /// Replace a cached report in place. Reports the user does not have cached are ignored.
    pub async fn replace_report(&self, user: &AuthenticatedUser, report: Report) {
        self.patch(user, |session| {
            if let Some(slot) = session.reports.iter_mut().find(|r| r.id == report.id) {
                *slot = report;
            }
        })
        .await;
    }

    pub async fn remove_report(&self, user: &AuthenticatedUser, report_id: &str) {
        self.patch(user, |session| {
            session.reports.retain(|r| r.id != report_id);
        })
        .await;
    }

    pub async fn push_notification(&self, user: &AuthenticatedUser, notification: Notification) {
        self.patch(user, |session| {
            session.notifications.insert(0, notification);
        })
        .await;
    }

    /// Deliver a notification to whichever cached session owns `user_id`
    pub async fn push_notification_for_owner(&self, notification: Notification) {
        let mut sessions = self.sessions.write().await;
        let owner = sessions
            .values_mut()
            .find(|session| session.owner_ids.contains(&notification.user_id));
        if let Some(session) = owner {
            session.notifications.insert(0, notification);
        }
    }

    /// Apply an admin-side report change to the owner's cached entry
    pub async fn replace_report_for_owner(&self, report: &Report) {
        let mut sessions = self.sessions.write().await;
        for session in sessions.values_mut() {
            if let Some(slot) = session.reports.iter_mut().find(|r| r.id == report.id) {
                *slot = report.clone();
            }
        }
    }

    pub async fn mark_notification_read(&self, user: &AuthenticatedUser, notification_id: &str) {
        self.patch(user, |session| {
            if let Some(n) = session
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
            {
                n.read = true;
            }
        })
        .await;
    }

    pub async fn mark_all_read(&self, user: &AuthenticatedUser) {
        self.patch(user, |session| {
            session.notifications.iter_mut().for_each(|n| n.read = true);
        })
        .await;
    }

    /// Mutate the user's entry if it is cached; otherwise the next snapshot loads fresh data
    async fn patch(&self, user: &AuthenticatedUser, apply: impl FnOnce(&mut UserSession)) {
        if let Some(session) = self.sessions.write().await.get_mut(user.session_key()) {
            apply(session);
        }
    }
}
