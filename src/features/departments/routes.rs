use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::departments::handlers;
use crate::features::departments::services::DepartmentService;
use crate::features::departments::DepartmentState;
use crate::features::session::services::SessionCache;

fn state(
    department_service: Arc<DepartmentService>,
    session: Arc<SessionCache>,
) -> DepartmentState {
    DepartmentState {
        department_service,
        session,
    }
}

/// Public department routes (no authentication required)
pub fn public_routes(
    department_service: Arc<DepartmentService>,
    session: Arc<SessionCache>,
) -> Router {
    Router::new()
        .route("/api/departments", get(handlers::list_active_departments))
        .with_state(state(department_service, session))
}

/// Admin department routes (require JWT authentication)
pub fn admin_routes(
    department_service: Arc<DepartmentService>,
    session: Arc<SessionCache>,
) -> Router {
    Router::new()
        .route(
            "/api/admin/departments",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/api/admin/departments/{id}",
            patch(handlers::update_department).delete(handlers::delete_department),
        )
        .with_state(state(department_service, session))
}
