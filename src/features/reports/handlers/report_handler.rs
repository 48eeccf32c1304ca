use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::ValidJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{CreateReportDto, ReportResponseDto, UpdateReportDto};
use crate::features::reports::services::ReportService;
use crate::features::session::services::SessionCache;
use crate::shared::types::ApiResponse;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub session: Arc<SessionCache>,
}

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    ValidJson(dto): ValidJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let owner_id = user.profile_id().to_string();
    let (report, notification) = state.report_service.create(&owner_id, &dto).await?;

    state.session.insert_report(&user, report.clone()).await;
    if let Some(notification) = notification {
        state.session.push_notification(&user, notification).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List the caller's reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of user's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state
        .report_service
        .list_for_owner_ids(&user.owner_ids())
        .await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get one of the caller's reports
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_owned(&user, &id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Edit a report while it is pending or assigned
#[utoipa::path(
    patch,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Report can no longer be edited"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    ValidJson(dto): ValidJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.update(&user, &id, &dto).await?;
    state.session.replace_report(&user, report.clone()).await;

    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report updated successfully".to_string()),
        None,
    )))
}

/// Delete a report while it is still pending
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Report can no longer be deleted"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.report_service.delete(&user, &id).await?;
    state.session.remove_report(&user, &id).await;

    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted successfully".to_string()),
        None,
    )))
}
