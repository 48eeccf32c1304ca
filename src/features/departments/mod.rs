//! Municipal departments reports are filed under.

use std::sync::Arc;

use crate::features::session::services::SessionCache;

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DepartmentService;

/// State for department handlers
#[derive(Clone)]
pub struct DepartmentState {
    pub department_service: Arc<DepartmentService>,
    pub session: Arc<SessionCache>,
}
