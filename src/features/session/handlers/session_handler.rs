use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::session::dtos::{ReportStatsDto, SessionSnapshotDto};
use crate::features::session::services::SessionCache;
use crate::shared::types::ApiResponse;

/// Cached session for the caller, loaded on first access
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Session snapshot", body = ApiResponse<SessionSnapshotDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "session",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_session(
    user: AuthenticatedUser,
    State(session): State<Arc<SessionCache>>,
) -> Result<Json<ApiResponse<SessionSnapshotDto>>> {
    let (snapshot, departments) =
        tokio::try_join!(session.snapshot(&user), session.departments())?;
    Ok(Json(ApiResponse::success(
        Some(SessionSnapshotDto::new(snapshot, departments)),
        None,
        None,
    )))
}

/// Reload the caller's reports and notifications from the store
#[utoipa::path(
    post,
    path = "/api/session/refresh",
    responses(
        (status = 200, description = "Session reloaded", body = ApiResponse<SessionSnapshotDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "session",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh_session(
    user: AuthenticatedUser,
    State(session): State<Arc<SessionCache>>,
) -> Result<Json<ApiResponse<SessionSnapshotDto>>> {
    let (snapshot, departments) =
        tokio::try_join!(session.refresh(&user), session.refresh_departments())?;
    Ok(Json(ApiResponse::success(
        Some(SessionSnapshotDto::new(snapshot, departments)),
        None,
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/session/stats",
    responses(
        (status = 200, description = "Report counts for the caller", body = ApiResponse<ReportStatsDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "session",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_stats(
    user: AuthenticatedUser,
    State(session): State<Arc<SessionCache>>,
) -> Result<Json<ApiResponse<ReportStatsDto>>> {
    let stats = session.stats(&user).await?;
    Ok(Json(ApiResponse::success(Some(stats.into()), None, None)))
}

/// Drop the caller's cached session (sign-out)
#[utoipa::path(
    delete,
    path = "/api/session",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "session",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_session(
    user: AuthenticatedUser,
    State(session): State<Arc<SessionCache>>,
) -> StatusCode {
    session.invalidate(&user).await;
    tracing::debug!("Session cleared for {}", user.uid);
    StatusCode::NO_CONTENT
}
