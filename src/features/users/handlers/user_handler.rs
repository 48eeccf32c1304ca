use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ValidJson};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    RegisterCitizenDto, UpdatePresenceDto, UpdateProfileDto, UserExistsResponseDto,
    UserResponseDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// Check whether a phone number is already registered (public)
#[utoipa::path(
    get,
    path = "/api/users/exists/{phone}",
    params(
        ("phone" = String, Path, description = "Phone number")
    ),
    responses(
        (status = 200, description = "Lookup result", body = ApiResponse<UserExistsResponseDto>)
    ),
    tag = "users"
)]
pub async fn check_user_exists(
    State(service): State<Arc<UserService>>,
    Path(phone): Path<String>,
) -> Result<Json<ApiResponse<UserExistsResponseDto>>> {
    let exists = service.check_user_exists(&phone).await?;
    Ok(Json(ApiResponse::success(
        Some(UserExistsResponseDto { exists }),
        None,
        None,
    )))
}

/// Register the caller as a citizen
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterCitizenDto,
    responses(
        (status = 201, description = "Citizen registered", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Token has no verified phone, or it does not match"),
        (status = 409, description = "Phone already registered")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn register_citizen(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    ValidJson(dto): ValidJson<RegisterCitizenDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    let Some(phone) = user.phone.as_deref() else {
        return Err(AppError::Forbidden(
            "Sign in with a verified phone number to register".to_string(),
        ));
    };
    if phone != dto.phone.trim() {
        return Err(AppError::Forbidden(
            "Phone number does not match the signed-in account".to_string(),
        ));
    }

    let registered = service.register_citizen(&dto, Some(&user.uid)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(registered.into()),
            Some("Registration successful".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not registered yet")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let profile = service.get_own_profile(&user).await?;
    Ok(Json(ApiResponse::success(Some(profile.into()), None, None)))
}

#[utoipa::path(
    patch,
    path = "/api/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not registered yet")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    ValidJson(dto): ValidJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let profile = service.get_own_profile(&user).await?;
    let updated = service.update_user_profile(&profile.id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(updated.into()),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}

/// Record the caller's presence
#[utoipa::path(
    patch,
    path = "/api/users/presence",
    request_body = UpdatePresenceDto,
    responses(
        (status = 200, description = "Presence updated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not registered yet")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_presence(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<UpdatePresenceDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.update_presence(&user, dto.status).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
