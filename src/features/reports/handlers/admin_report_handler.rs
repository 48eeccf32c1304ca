use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, ValidJson};
use crate::features::auth::guards::RequireAdmin;
use crate::features::reports::dtos::{
    AssignReportDto, ChangeDepartmentDto, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::handlers::ReportState;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List every report, newest first (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_all_reports(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ReportState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = state.report_service.list_all(&pagination).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get any report by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/reports/{id}",
    operation_id = "admin_get_report",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_report(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Change a report's status and notify its owner (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/reports/{id}/status",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_report_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let (report, notification) = state.report_service.update_status(&id, dto.status).await?;

    state.session.replace_report_for_owner(&report).await;
    state.session.push_notification_for_owner(notification).await;

    tracing::info!("Admin {} set report {} to {}", admin.uid, id, dto.status);
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Assign a report to a department user (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/reports/{id}/assign",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = AssignReportDto,
    responses(
        (status = 200, description = "Report assigned", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn assign_report(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    ValidJson(dto): ValidJson<AssignReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.assign(&id, &dto).await?;
    state.session.replace_report_for_owner(&report).await;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Move a report to another department (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/reports/{id}/department",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = ChangeDepartmentDto,
    responses(
        (status = 200, description = "Department changed", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn change_report_department(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    ValidJson(dto): ValidJson<ChangeDepartmentDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.change_department(&id, &dto).await?;
    state.session.replace_report_for_owner(&report).await;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
