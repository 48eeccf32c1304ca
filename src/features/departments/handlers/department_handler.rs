use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::ValidJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::departments::dtos::{
    CreateDepartmentDto, DepartmentResponseDto, UpdateDepartmentDto,
};
use crate::features::departments::DepartmentState;
use crate::shared::types::ApiResponse;

/// List active departments (public)
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Active departments", body = ApiResponse<Vec<DepartmentResponseDto>>)
    ),
    tag = "departments"
)]
pub async fn list_active_departments(
    State(state): State<DepartmentState>,
) -> Result<Json<ApiResponse<Vec<DepartmentResponseDto>>>> {
    let departments = state.session.departments().await?;
    let dtos: Vec<DepartmentResponseDto> = departments
        .into_iter()
        .filter(|d| d.is_active)
        .map(|d| d.into())
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// List all departments, including inactive ones (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/departments",
    responses(
        (status = 200, description = "All departments", body = ApiResponse<Vec<DepartmentResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "departments"
)]
pub async fn list_departments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<DepartmentState>,
) -> Result<Json<ApiResponse<Vec<DepartmentResponseDto>>>> {
    let departments = state.department_service.list_all().await?;
    let dtos: Vec<DepartmentResponseDto> = departments.into_iter().map(|d| d.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Create a department (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = ApiResponse<DepartmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "departments"
)]
pub async fn create_department(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<DepartmentState>,
    ValidJson(dto): ValidJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<DepartmentResponseDto>>)> {
    let department = state.department_service.create(&dto).await?;
    state.session.refresh_departments().await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(department.into()), None, None)),
    ))
}

/// Update a department (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/departments/{id}",
    params(
        ("id" = String, Path, description = "Department ID")
    ),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = ApiResponse<DepartmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "departments"
)]
pub async fn update_department(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<DepartmentState>,
    Path(id): Path<String>,
    ValidJson(dto): ValidJson<UpdateDepartmentDto>,
) -> Result<Json<ApiResponse<DepartmentResponseDto>>> {
    let department = state.department_service.update(&id, &dto).await?;
    state.session.refresh_departments().await?;
    Ok(Json(ApiResponse::success(Some(department.into()), None, None)))
}

/// Delete a department (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/departments/{id}",
    params(
        ("id" = String, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "departments"
)]
pub async fn delete_department(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<DepartmentState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.department_service.delete(&id).await?;
    state.session.refresh_departments().await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Department deleted".to_string()),
        None,
    )))
}
