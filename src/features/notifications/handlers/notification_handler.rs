use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::dtos::{MarkAllReadResponseDto, NotificationResponseDto};
use crate::features::notifications::NotificationState;
use crate::shared::types::ApiResponse;

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<Vec<NotificationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    user: AuthenticatedUser,
    State(state): State<NotificationState>,
) -> Result<Json<ApiResponse<Vec<NotificationResponseDto>>>> {
    let notifications = state
        .notification_service
        .list_for_owner_ids(&user.owner_ids())
        .await?;
    let dtos: Vec<NotificationResponseDto> =
        notifications.into_iter().map(|n| n.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Mark one of the caller's notifications read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Marked read"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the caller's notification"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_read(
    user: AuthenticatedUser,
    State(state): State<NotificationState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.notification_service.mark_read(&user, &id).await?;
    state.session.mark_notification_read(&user, &id).await;
    Ok(Json(ApiResponse::success(None, None, None)))
}

/// Mark all of the caller's notifications read
#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All marked read", body = ApiResponse<MarkAllReadResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_all_read(
    user: AuthenticatedUser,
    State(state): State<NotificationState>,
) -> Result<Json<ApiResponse<MarkAllReadResponseDto>>> {
    let updated = state.notification_service.mark_all_read(&user).await?;
    state.session.mark_all_read(&user).await;
    Ok(Json(ApiResponse::success(
        Some(MarkAllReadResponseDto { updated }),
        None,
        None,
    )))
}
