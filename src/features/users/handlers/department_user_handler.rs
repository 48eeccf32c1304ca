use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, ValidJson};
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{
    CreateDepartmentUserDto, DepartmentUserQuery, SetUserActiveDto, UpdateDepartmentUserDto,
    UserResponseDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// List department users (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/department-users",
    params(DepartmentUserQuery),
    responses(
        (status = 200, description = "Department users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_department_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Query(query): Query<DepartmentUserQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service
        .list_department_users(query.department_id.as_deref())
        .await?;
    let total = users.len() as i64;
    let dtos: Vec<UserResponseDto> = users.into_iter().map(|u| u.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(crate::shared::types::Meta { total }),
    )))
}

/// Create a department user (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/department-users",
    request_body = CreateDepartmentUserDto,
    responses(
        (status = 201, description = "Department user created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_department_user(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    ValidJson(dto): ValidJson<CreateDepartmentUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    let user = service.create_department_user(&dto, &admin.uid).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user.into()), None, None)),
    ))
}

/// Update a department user (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/department-users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateDepartmentUserDto,
    responses(
        (status = 200, description = "Department user updated", body = ApiResponse<UserResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_department_user(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
    ValidJson(dto): ValidJson<UpdateDepartmentUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.update_department_user(&id, &dto).await?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Enable or disable a department user (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/department-users/{id}/active",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = SetUserActiveDto,
    responses(
        (status = 200, description = "Active flag updated", body = ApiResponse<UserResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn set_department_user_active(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<SetUserActiveDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.set_active(&id, dto.is_active).await?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}
