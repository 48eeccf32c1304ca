use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationService;
use crate::features::notifications::NotificationState;
use crate::features::session::services::SessionCache;

/// Create routes for the notifications feature (auth required)
pub fn routes(
    notification_service: Arc<NotificationService>,
    session: Arc<SessionCache>,
) -> Router {
    let state = NotificationState {
        notification_service,
        session,
    };

    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .route("/api/notifications/read-all", patch(handlers::mark_all_read))
        .route("/api/notifications/{id}/read", patch(handlers::mark_read))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::dtos::{MarkAllReadResponseDto, NotificationResponseDto};
    use crate::features::notifications::models::NewNotification;
    use crate::shared::test_helpers::{
        create_citizen_user, with_user, TestContext, CITIZEN_PHONE, CITIZEN_UID,
    };
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_list_and_mark_read() {
        let ctx = TestContext::new();
        let n1 = ctx
            .notifications
            .add(NewNotification::report_submitted(CITIZEN_UID, "r1"))
            .await
            .unwrap();
        ctx.notifications
            .add(NewNotification::report_submitted(CITIZEN_PHONE, "r2"))
            .await
            .unwrap();
        let foreign = ctx
            .notifications
            .add(NewNotification::report_submitted("someone-else", "r3"))
            .await
            .unwrap();

        let app = routes(ctx.notifications.clone(), ctx.session.clone());
        let server = TestServer::new(with_user(app, create_citizen_user())).unwrap();

        let listed = server
            .get("/api/notifications")
            .await
            .json::<ApiResponse<Vec<NotificationResponseDto>>>()
            .data
            .unwrap();
        assert_eq!(listed.len(), 2);

        server
            .patch(&format!("/api/notifications/{}/read", n1.id))
            .await
            .assert_status_ok();
        server
            .patch(&format!("/api/notifications/{}/read", foreign.id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let result = server
            .patch("/api/notifications/read-all")
            .await
            .json::<ApiResponse<MarkAllReadResponseDto>>()
            .data
            .unwrap();
        assert_eq!(result.updated, 1);
    }
}
