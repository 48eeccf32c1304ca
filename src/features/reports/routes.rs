use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers::{self, admin_report_handler, ReportState};
use crate::features::reports::services::ReportService;
use crate::features::session::services::SessionCache;

/// Create routes for the reports feature
///
/// All routes require the auth middleware to be applied by the caller.
/// `/api/admin/...` routes additionally require the admin role.
pub fn routes(
    report_service: Arc<ReportService>,
    session: Arc<SessionCache>,
) -> Router {
    let state = ReportState {
        report_service,
        session,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .patch(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route("/api/admin/reports", get(admin_report_handler::list_all_reports))
        .route("/api/admin/reports/{id}", get(admin_report_handler::get_report))
        .route(
            "/api/admin/reports/{id}/status",
            patch(admin_report_handler::update_report_status),
        )
        .route(
            "/api/admin/reports/{id}/assign",
            patch(admin_report_handler::assign_report),
        )
        .route(
            "/api/admin/reports/{id}/department",
            patch(admin_report_handler::change_report_department),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::dtos::ReportResponseDto;
    use crate::features::reports::models::ReportStatus;
    use crate::shared::test_helpers::{
        create_admin_user, create_citizen_user, with_user, TestContext, CITIZEN_PHONE,
    };
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use fake::faker::lorem::en::{Sentence, Word};
    use fake::Fake;
    use serde_json::json;

    struct Servers {
        ctx: TestContext,
        citizen: TestServer,
        admin: TestServer,
    }

    fn servers() -> Servers {
        let ctx = TestContext::new();
        let app = routes(ctx.reports.clone(), ctx.session.clone());
        let citizen = TestServer::new(with_user(app.clone(), create_citizen_user())).unwrap();
        let admin = TestServer::new(with_user(app, create_admin_user())).unwrap();
        Servers {
            ctx,
            citizen,
            admin,
        }
    }

    async fn submit(server: &TestServer) -> ReportResponseDto {
        let title: String = Sentence(2..4).fake();
        let response = server
            .post("/api/reports")
            .json(&json!({
                "category": "Garbage",
                "title": title,
                "location": Word().fake::<String>(),
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap()
    }

    #[tokio::test]
    async fn test_citizen_report_lifecycle() {
        let s = servers();
        let report = submit(&s.citizen).await;
        assert_eq!(report.user_id, CITIZEN_PHONE);
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(report.can_edit && report.can_delete);

        let listed = s
            .citizen
            .get("/api/reports")
            .await
            .json::<ApiResponse<Vec<ReportResponseDto>>>()
            .data
            .unwrap();
        assert_eq!(listed.len(), 1);

        let updated = s
            .citizen
            .patch(&format!("/api/reports/{}", report.id))
            .json(&json!({ "title": "  Overflowing bins  " }))
            .await
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(updated.title, "Overflowing bins");
        assert_eq!(updated.timeline.len(), 2);

        s.citizen
            .delete(&format!("/api/reports/{}", report.id))
            .await
            .assert_status_ok();
        s.citizen
            .get(&format!("/api/reports/{}", report.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_gate_after_admin_change() {
        let s = servers();
        let report = submit(&s.citizen).await;

        let resolved = s
            .admin
            .patch(&format!("/api/admin/reports/{}/status", report.id))
            .json(&json!({ "status": "resolved" }))
            .await
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(resolved.status, ReportStatus::Resolved);
        assert!(!resolved.can_edit && !resolved.can_delete);

        let response = s
            .citizen
            .patch(&format!("/api/reports/{}", report.id))
            .json(&json!({ "title": "Too late" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body = response.json::<ApiResponse<()>>();
        assert!(!body.success);

        s.citizen
            .delete(&format!("/api/reports/{}", report.id))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        assert!(s.ctx.reports.get_by_id(&report.id).await.is_ok());

        let notifications = s
            .ctx
            .notifications
            .list_for_user(CITIZEN_PHONE)
            .await
            .unwrap();
        assert_eq!(notifications[0].title_key, "reportUpdate");
    }

    #[tokio::test]
    async fn test_non_canonical_status_is_rejected() {
        let s = servers();
        let report = submit(&s.citizen).await;

        s.admin
            .patch(&format!("/api/admin/reports/{}/status", report.id))
            .json(&json!({ "status": "In Progress" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_title_is_bad_request() {
        let s = servers();
        let report = submit(&s.citizen).await;

        s.citizen
            .patch(&format!("/api/reports/{}", report.id))
            .json(&json!({ "title": "   " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin() {
        let s = servers();
        s.citizen
            .get("/api/admin/reports")
            .await
            .assert_status(StatusCode::FORBIDDEN);

        submit(&s.citizen).await;
        submit(&s.citizen).await;
        let page = s
            .admin
            .get("/api/admin/reports")
            .add_query_param("pageSize", 1)
            .await
            .json::<ApiResponse<Vec<ReportResponseDto>>>();
        assert_eq!(page.data.unwrap().len(), 1);
        assert_eq!(page.meta.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_assign_and_move_department() {
        let s = servers();
        let report = submit(&s.citizen).await;

        let assigned = s
            .admin
            .patch(&format!("/api/admin/reports/{}/assign", report.id))
            .json(&json!({ "assigneeId": "du-1", "assigneeName": "Ali" }))
            .await
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(assigned.status, ReportStatus::Assigned);
        assert!(assigned.can_edit && !assigned.can_delete);

        let moved = s
            .admin
            .patch(&format!("/api/admin/reports/{}/department", report.id))
            .json(&json!({ "department": "Electricity" }))
            .await
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(moved.category, "Electricity");
        assert!(moved.assigned_to.is_none());
    }
}
