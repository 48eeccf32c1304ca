use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::session::handlers;
use crate::features::session::services::SessionCache;

pub fn routes(session: Arc<SessionCache>) -> Router {
    Router::new()
        .route(
            "/api/session",
            get(handlers::get_session).delete(handlers::clear_session),
        )
        .route("/api/session/refresh", post(handlers::refresh_session))
        .route("/api/session/stats", get(handlers::get_stats))
        .with_state(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::dtos::CreateReportDto;
    use crate::features::reports::models::ReportStatus;
    use crate::features::session::dtos::{ReportStatsDto, SessionSnapshotDto};
    use crate::shared::test_helpers::{
        create_admin_user, create_citizen_user, with_user, TestContext,
    };
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn new_report() -> CreateReportDto {
        CreateReportDto {
            category: "Water".into(),
            title: Sentence(2..4).fake(),
            description: Some(Sentence(5..10).fake()),
            location: Some("Block 7".into()),
            priority: None,
            contact_info: None,
            media: vec![],
        }
    }

    #[tokio::test]
    async fn test_snapshot_then_refresh_picks_up_external_writes() {
        let ctx = TestContext::new();
        ctx.departments.seed_defaults().await.unwrap();
        let citizen = create_citizen_user();
        let server =
            TestServer::new(with_user(routes(ctx.session.clone()), citizen.clone())).unwrap();

        let first = server
            .get("/api/session")
            .await
            .json::<ApiResponse<SessionSnapshotDto>>()
            .data
            .unwrap();
        assert!(first.reports.is_empty());
        assert_eq!(first.departments.len(), 8);
        assert!(!first.is_admin);

        // Written behind the cache's back
        let (report, _) = ctx
            .reports
            .create(citizen.profile_id(), &new_report())
            .await
            .unwrap();

        let cached = server
            .get("/api/session")
            .await
            .json::<ApiResponse<SessionSnapshotDto>>()
            .data
            .unwrap();
        assert!(cached.reports.is_empty());

        let refreshed = server
            .post("/api/session/refresh")
            .await
            .json::<ApiResponse<SessionSnapshotDto>>()
            .data
            .unwrap();
        assert_eq!(refreshed.reports.len(), 1);
        assert_eq!(refreshed.reports[0].id, report.id);
        assert_eq!(refreshed.unread_notifications, 1);
        assert_eq!(refreshed.stats.pending, 1);
    }

    #[tokio::test]
    async fn test_stats_count_assigned_as_pending() {
        let ctx = TestContext::new();
        let citizen = create_citizen_user();
        let server =
            TestServer::new(with_user(routes(ctx.session.clone()), citizen.clone())).unwrap();

        for status in [ReportStatus::Assigned, ReportStatus::Resolved] {
            let (report, _) = ctx
                .reports
                .create(citizen.profile_id(), &new_report())
                .await
                .unwrap();
            ctx.reports.update_status(&report.id, status).await.unwrap();
        }
        ctx.reports
            .create(citizen.profile_id(), &new_report())
            .await
            .unwrap();

        let stats = server
            .get("/api/session/stats")
            .await
            .json::<ApiResponse<ReportStatsDto>>()
            .data
            .unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.resolved, 1);
    }

    #[tokio::test]
    async fn test_clear_session_drops_cached_entry() {
        let ctx = TestContext::new();
        let citizen = create_citizen_user();
        let server =
            TestServer::new(with_user(routes(ctx.session.clone()), citizen.clone())).unwrap();

        server.get("/api/session").await.assert_status_ok();
        ctx.reports
            .create(citizen.profile_id(), &new_report())
            .await
            .unwrap();

        server
            .delete("/api/session")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let reloaded = server
            .get("/api/session")
            .await
            .json::<ApiResponse<SessionSnapshotDto>>()
            .data
            .unwrap();
        assert_eq!(reloaded.reports.len(), 1);
    }

    #[tokio::test]
    async fn test_admin_flag_reported() {
        let ctx = TestContext::new();
        let server =
            TestServer::new(with_user(routes(ctx.session.clone()), create_admin_user())).unwrap();

        let snapshot = server
            .get("/api/session")
            .await
            .json::<ApiResponse<SessionSnapshotDto>>()
            .data
            .unwrap();
        assert!(snapshot.is_admin);
    }
}
