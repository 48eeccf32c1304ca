use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::models::{NewNotification, Notification};
use crate::features::notifications::services::NotificationService;
use crate::features::reports::dtos::{
    AssignReportDto, ChangeDepartmentDto, CreateReportDto, UpdateReportDto,
};
use crate::features::reports::models::{Report, ReportStatus, TimelineEntry};
use crate::features::reports::policy;
use crate::modules::document_store::{
    collections, encode, generate_id, query_any_of, Document, DocumentStore, Fields, Filter,
};
use crate::shared::constants::{DEFAULT_REPORT_LOCATION, TIMELINE_FIELD};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::{require_non_empty, trim_to_option};

/// Service for report operations
pub struct ReportService {
    store: Arc<dyn DocumentStore>,
    notifications: Arc<NotificationService>,
}

impl ReportService {
    pub fn new(store: Arc<dyn DocumentStore>, notifications: Arc<NotificationService>) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// File a new report for `user_id`.
    ///
    /// Also returns the "submitted" notification when it could be stored.
    pub async fn create(
        &self,
        user_id: &str,
        dto: &CreateReportDto,
    ) -> Result<(Report, Option<Notification>)> {
        let user_id = require_non_empty(user_id, "User ID")?;
        let category = require_non_empty(&dto.category, "Category")?;
        let title = require_non_empty(&dto.title, "Title")?;

        let now = Utc::now();
        let report = Report {
            id: generate_id(),
            user_id,
            category,
            title,
            description: dto
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            location: trim_to_option(dto.location.as_deref())
                .unwrap_or_else(|| DEFAULT_REPORT_LOCATION.to_string()),
            contact_info: trim_to_option(dto.contact_info.as_deref()),
            priority: dto.priority.unwrap_or_default(),
            status: ReportStatus::Pending,
            assigned_to: None,
            assigned_user_name: None,
            media: dto.media.clone(),
            timeline: vec![TimelineEntry::new("Report submitted", ReportStatus::Pending)],
            created_at: now,
            updated_at: now,
        };

        self.store
            .put(collections::REPORTS, Some(&report.id), encode(&report)?)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::from(e)
            })?;

        tracing::info!("Created report: {} for user: {}", report.id, report.user_id);

        let notification = match self
            .notifications
            .add(NewNotification::report_submitted(&report.user_id, &report.id))
            .await
        {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(
                    "Report {} created but submission notification failed: {:?}",
                    report.id,
                    e
                );
                None
            }
        };

        Ok((report, notification))
    }

    /// Get report by id regardless of owner
    pub async fn get_by_id(&self, id: &str) -> Result<Report> {
        let doc = self
            .store
            .get(collections::REPORTS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
        Ok(doc.decode()?)
    }

    /// Get a report owned by `user`. Someone else's report reads as missing.
    pub async fn get_owned(&self, user: &AuthenticatedUser, id: &str) -> Result<Report> {
        let report = self.get_by_id(id).await?;
        if !user.owns(&report.user_id) {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }
        Ok(report)
    }

    /// Reports filed under one user id, newest first
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Report>> {
        self.list_for_owner_ids(&[user_id]).await
    }

    /// Reports filed under any of the given ids, newest first
    pub async fn list_for_owner_ids(&self, owner_ids: &[&str]) -> Result<Vec<Report>> {
        let docs = query_any_of(self.store.as_ref(), collections::REPORTS, "userId", owner_ids)
            .await?;
        decode_newest_first(docs)
    }

    /// Every report, newest first, one page at a time
    pub async fn list_all(&self, pagination: &PaginationQuery) -> Result<(Vec<Report>, i64)> {
        let docs = self
            .store
            .query(collections::REPORTS, &Filter::new())
            .await?;
        let reports = decode_newest_first(docs)?;
        Ok(pagination.paginate(reports))
    }

    /// Citizen edit of their own report, gated on the stored status
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        dto: &UpdateReportDto,
    ) -> Result<Report> {
        let report = self.get_by_id(id).await?;
        ensure_owner(user, &report)?;

        let (fields, entry) = policy::prepare_citizen_edit(report.status, dto)?;
        self.write_with_entry(id, fields, &entry).await?;

        tracing::info!("Report {} updated by citizen {}", id, user.uid);
        self.get_by_id(id).await
    }

    /// Citizen hard delete, allowed only while pending
    pub async fn delete(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        let report = self.get_by_id(id).await?;
        ensure_owner(user, &report)?;
        policy::ensure_deletable(report.status)?;

        self.store
            .delete(collections::REPORTS, id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report {}: {:?}", id, e);
                AppError::from(e)
            })?;

        tracing::info!("Report {} deleted by citizen {}", id, user.uid);
        Ok(())
    }

    /// Admin status change. Any status may follow any other.
    ///
    /// The owner is notified of the new status.
    pub async fn update_status(
        &self,
        id: &str,
        new_status: ReportStatus,
    ) -> Result<(Report, Notification)> {
        let report = self.get_by_id(id).await?;

        let (fields, entry) = policy::status_change(new_status)?;
        self.write_with_entry(id, fields, &entry).await?;

        let notification = self
            .notifications
            .add(NewNotification::report_status_changed(
                &report.user_id,
                id,
                new_status,
            ))
            .await?;

        tracing::info!(
            "Report {} status changed from {} to {}",
            id,
            report.status,
            new_status
        );

        Ok((self.get_by_id(id).await?, notification))
    }

    /// Hand a report to a department user
    pub async fn assign(&self, id: &str, dto: &AssignReportDto) -> Result<Report> {
        self.get_by_id(id).await?;
        let assignee_name = require_non_empty(&dto.assignee_name, "Assignee name")?;

        let mut fields = timestamped(ReportStatus::Assigned)?;
        fields.insert("assignedTo".into(), Value::String(dto.assignee_id.clone()));
        fields.insert("assignedUserName".into(), Value::String(assignee_name.clone()));

        let entry = TimelineEntry::new(
            format!("Report assigned to {}", assignee_name),
            ReportStatus::Assigned,
        );
        self.write_with_entry(id, fields, &entry).await?;

        tracing::info!("Report {} assigned to {}", id, dto.assignee_id);
        self.get_by_id(id).await
    }

    /// Move a report to another department; the assignee is cleared
    pub async fn change_department(&self, id: &str, dto: &ChangeDepartmentDto) -> Result<Report> {
        self.get_by_id(id).await?;
        let department = require_non_empty(&dto.department, "Department")?;

        let mut fields = timestamped(ReportStatus::Pending)?;
        fields.insert("category".into(), Value::String(department.clone()));
        fields.insert("assignedTo".into(), Value::Null);
        fields.insert("assignedUserName".into(), Value::Null);

        let entry = TimelineEntry::new(
            format!("Department changed to {}", department),
            ReportStatus::Pending,
        );
        self.write_with_entry(id, fields, &entry).await?;

        tracing::info!("Report {} moved to department {}", id, department);
        self.get_by_id(id).await
    }

    async fn write_with_entry(
        &self,
        id: &str,
        fields: Fields,
        entry: &TimelineEntry,
    ) -> Result<()> {
        self.store
            .update_and_append(
                collections::REPORTS,
                id,
                fields,
                TIMELINE_FIELD,
                policy::timeline_value(entry)?,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report {}: {:?}", id, e);
                AppError::from(e)
            })
    }
}

fn ensure_owner(user: &AuthenticatedUser, report: &Report) -> Result<()> {
    if user.owns(&report.user_id) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You can only modify your own reports".to_string(),
    ))
}

fn timestamped(status: ReportStatus) -> Result<Fields> {
    let mut fields = Fields::new();
    fields.insert("status".into(), serde_json::to_value(status)?);
    fields.insert("updatedAt".into(), serde_json::to_value(Utc::now())?);
    Ok(fields)
}

fn decode_newest_first(docs: Vec<Document>) -> Result<Vec<Report>> {
    let mut reports = docs
        .into_iter()
        .map(|doc| doc.decode::<Report>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(reports)
}
