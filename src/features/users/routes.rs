use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::users::handlers::{self, department_user_handler};
use crate::features::users::services::UserService;

/// Public user routes (no authentication required)
pub fn public_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/exists/{phone}", get(handlers::check_user_exists))
        .with_state(service)
}

/// Protected user routes (require JWT authentication)
pub fn protected_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/register", post(handlers::register_citizen))
        .route(
            "/api/me",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route("/api/users/presence", patch(handlers::update_presence))
        .route(
            "/api/admin/department-users",
            get(department_user_handler::list_department_users)
                .post(department_user_handler::create_department_user),
        )
        .route(
            "/api/admin/department-users/{id}",
            patch(department_user_handler::update_department_user),
        )
        .route(
            "/api/admin/department-users/{id}/active",
            patch(department_user_handler::set_department_user_active),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::users::dtos::{UserExistsResponseDto, UserResponseDto};
    use crate::features::users::models::{PresenceStatus, UserRole};
    use crate::shared::test_helpers::{
        create_admin_user, create_citizen_user, with_user, TestContext, CITIZEN_PHONE,
    };
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use serde_json::json;

    fn app(ctx: &TestContext) -> Router {
        Router::new()
            .merge(public_routes(ctx.users.clone()))
            .merge(protected_routes(ctx.users.clone()))
    }

    #[tokio::test]
    async fn test_register_then_profile_round() {
        let ctx = TestContext::new();
        let server = TestServer::new(with_user(app(&ctx), create_citizen_user())).unwrap();

        let exists = server
            .get(&format!("/api/users/exists/{}", CITIZEN_PHONE))
            .await
            .json::<ApiResponse<UserExistsResponseDto>>()
            .data
            .unwrap();
        assert!(!exists.exists);

        server
            .get("/api/me")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post("/api/users/register")
            .json(&json!({
                "phone": CITIZEN_PHONE,
                "firstName": "Sara",
                "lastName": "Khan",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let registered = response.json::<ApiResponse<UserResponseDto>>().data.unwrap();
        assert_eq!(registered.name.as_deref(), Some("Sara Khan"));
        assert_eq!(registered.role, UserRole::Citizen);

        server
            .post("/api/users/register")
            .json(&json!({ "phone": CITIZEN_PHONE }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let updated = server
            .patch("/api/me")
            .json(&json!({ "name": "Sara K." }))
            .await
            .json::<ApiResponse<UserResponseDto>>()
            .data
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Sara K."));

        server
            .patch("/api/users/presence")
            .json(&json!({ "status": "online" }))
            .await
            .assert_status_ok();
        let me = server
            .get("/api/me")
            .await
            .json::<ApiResponse<UserResponseDto>>()
            .data
            .unwrap();
        assert_eq!(me.status, Some(PresenceStatus::Online));
    }

    #[tokio::test]
    async fn test_register_with_foreign_phone_is_forbidden() {
        let ctx = TestContext::new();
        let server = TestServer::new(with_user(app(&ctx), create_citizen_user())).unwrap();

        server
            .post("/api/users/register")
            .json(&json!({ "phone": "+15550009999" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_register_without_verified_phone_is_forbidden() {
        let ctx = TestContext::new();
        let user = AuthenticatedUser {
            phone: None,
            ..create_citizen_user()
        };
        let server = TestServer::new(with_user(app(&ctx), user)).unwrap();

        server
            .post("/api/users/register")
            .json(&json!({ "phone": CITIZEN_PHONE }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        assert!(!ctx.users.check_user_exists(CITIZEN_PHONE).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_manages_department_users() {
        let ctx = TestContext::new();
        let admin = TestServer::new(with_user(app(&ctx), create_admin_user())).unwrap();
        let email: String = SafeEmail().fake();
        let full_name: String = Name().fake();

        let created = admin
            .post("/api/admin/department-users")
            .json(&json!({
                "fullName": full_name,
                "email": email,
                "departmentId": "Water",
            }))
            .await
            .json::<ApiResponse<UserResponseDto>>()
            .data
            .unwrap();
        assert_eq!(created.role, UserRole::DepartmentUser);

        admin
            .post("/api/admin/department-users")
            .json(&json!({
                "fullName": full_name,
                "email": email,
                "departmentId": "Gas",
            }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let disabled = admin
            .patch(&format!("/api/admin/department-users/{}/active", created.id))
            .json(&json!({ "isActive": false }))
            .await
            .json::<ApiResponse<UserResponseDto>>()
            .data
            .unwrap();
        assert!(!disabled.is_active);
        assert_eq!(disabled.status, Some(PresenceStatus::Disabled));

        let listed = admin
            .get("/api/admin/department-users")
            .add_query_param("departmentId", "Water")
            .await
            .json::<ApiResponse<Vec<UserResponseDto>>>();
        assert_eq!(listed.meta.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_citizen_cannot_list_department_users() {
        let ctx = TestContext::new();
        let citizen = TestServer::new(with_user(app(&ctx), create_citizen_user())).unwrap();
        citizen
            .get("/api/admin/department-users")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
