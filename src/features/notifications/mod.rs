//! Per-user notifications keyed by translation keys.

use std::sync::Arc;

use crate::features::session::services::SessionCache;

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::NotificationService;

/// State for notification handlers
#[derive(Clone)]
pub struct NotificationState {
    pub notification_service: Arc<NotificationService>,
    pub session: Arc<SessionCache>,
}
