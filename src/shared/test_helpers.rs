use std::sync::Arc;

use axum::{extract::Request, middleware::Next, Router};

use crate::features::auth::model::AuthenticatedUser;
use crate::features::departments::services::DepartmentService;
use crate::features::notifications::services::NotificationService;
use crate::features::reports::services::ReportService;
use crate::features::session::services::SessionCache;
use crate::features::users::models::UserRole;
use crate::features::users::services::UserService;
use crate::modules::document_store::{DocumentStore, MemoryDocumentStore};

pub const CITIZEN_UID: &str = "citizen-uid";
pub const CITIZEN_PHONE: &str = "+923001234567";
pub const ADMIN_UID: &str = "admin-uid";

/// Every service wired to one in-memory store
pub struct TestContext {
    pub store: Arc<dyn DocumentStore>,
    pub notifications: Arc<NotificationService>,
    pub reports: Arc<ReportService>,
    pub departments: Arc<DepartmentService>,
    pub users: Arc<UserService>,
    pub session: Arc<SessionCache>,
}

impl TestContext {
    pub fn new() -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let notifications = Arc::new(NotificationService::new(store.clone()));
        let reports = Arc::new(ReportService::new(store.clone(), notifications.clone()));
        let departments = Arc::new(DepartmentService::new(store.clone()));
        let users = Arc::new(UserService::new(store.clone()));
        let session = Arc::new(SessionCache::new(
            reports.clone(),
            notifications.clone(),
            departments.clone(),
        ));

        Self {
            store,
            notifications,
            reports,
            departments,
            users,
            session,
        }
    }
}

pub fn create_citizen_user() -> AuthenticatedUser {
    AuthenticatedUser {
        uid: CITIZEN_UID.to_string(),
        phone: Some(CITIZEN_PHONE.to_string()),
        role: UserRole::Citizen,
    }
}

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        uid: ADMIN_UID.to_string(),
        phone: None,
        role: UserRole::Admin,
    }
}

/// Attach `user` to every request, standing in for the auth middleware
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}
