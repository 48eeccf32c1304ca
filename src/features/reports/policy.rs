//! Status gates for citizen-side report mutations.
//!
//! Citizens may edit a report while it is `pending` or `assigned` and may
//! delete it only while it is `pending`. Admin transitions are not gated here.

use chrono::Utc;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::UpdateReportDto;
use crate::features::reports::models::{ReportStatus, TimelineEntry};
use crate::modules::document_store::Fields;
use crate::shared::validation::{require_non_empty, trim_to_option};

pub const CITIZEN_EDIT_NOTE: &str = "Report details updated by citizen";

pub fn can_edit(status: ReportStatus) -> bool {
    matches!(status, ReportStatus::Pending | ReportStatus::Assigned)
}

pub fn can_delete(status: ReportStatus) -> bool {
    status == ReportStatus::Pending
}

pub fn ensure_editable(status: ReportStatus) -> Result<()> {
    if can_edit(status) {
        return Ok(());
    }
    Err(AppError::Permission(format!(
        "Cannot edit this report. Reports can only be edited when status is \"Pending\" or \"Assigned\". Current status: {}",
        status.label()
    )))
}

pub fn ensure_deletable(status: ReportStatus) -> Result<()> {
    if can_delete(status) {
        return Ok(());
    }
    Err(AppError::Permission(format!(
        "Reports cannot be deleted when status is \"{}\". Only Pending reports can be deleted.",
        status.label()
    )))
}

/// Build the field changes and audit entry for a citizen edit.
///
/// Nothing is written; the caller persists both in one store call.
pub fn prepare_citizen_edit(
    current_status: ReportStatus,
    dto: &UpdateReportDto,
) -> Result<(Fields, TimelineEntry)> {
    ensure_editable(current_status)?;

    let mut fields = Fields::new();

    if let Some(title) = &dto.title {
        fields.insert("title".into(), require_non_empty(title, "Title")?.into());
    }
    if let Some(description) = &dto.description {
        fields.insert(
            "description".into(),
            require_non_empty(description, "Description")?.into(),
        );
    }
    if let Some(location) = &dto.location {
        fields.insert(
            "location".into(),
            require_non_empty(location, "Location")?.into(),
        );
    }
    if let Some(contact_info) = &dto.contact_info {
        let value = trim_to_option(Some(contact_info.as_str()))
            .map(Value::String)
            .unwrap_or(Value::Null);
        fields.insert("contactInfo".into(), value);
    }
    if let Some(media) = &dto.media {
        fields.insert("media".into(), serde_json::to_value(media)?);
    }

    fields.insert("updatedAt".into(), serde_json::to_value(Utc::now())?);

    Ok((fields, TimelineEntry::new(CITIZEN_EDIT_NOTE, current_status)))
}

/// Field changes for an admin status transition
pub fn status_change(new_status: ReportStatus) -> Result<(Fields, TimelineEntry)> {
    let mut fields = Fields::new();
    fields.insert("status".into(), serde_json::to_value(new_status)?);
    fields.insert("updatedAt".into(), serde_json::to_value(Utc::now())?);
    let note = format!("Status changed to {}", new_status.label());
    Ok((fields, TimelineEntry::new(note, new_status)))
}

/// Encode a timeline entry for `append_to_array_field`
pub fn timeline_value(entry: &TimelineEntry) -> Result<Value> {
    Ok(serde_json::to_value(entry)?)
}
