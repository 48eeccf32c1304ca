use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::departments::{dtos as departments_dtos, handlers as departments_handlers};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
    models as notifications_models,
};
use crate::features::reports::handlers::admin_report_handler;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::session::{dtos as session_dtos, handlers as session_handlers};
use crate::features::users::handlers::department_user_handler;
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::check_user_exists,
        users_handlers::register_citizen,
        users_handlers::get_profile,
        users_handlers::update_profile,
        users_handlers::update_presence,
        // Reports (citizen)
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        // Notifications
        notifications_handlers::list_notifications,
        notifications_handlers::mark_read,
        notifications_handlers::mark_all_read,
        // Departments
        departments_handlers::list_active_departments,
        departments_handlers::list_departments,
        departments_handlers::create_department,
        departments_handlers::update_department,
        departments_handlers::delete_department,
        // Session
        session_handlers::get_session,
        session_handlers::refresh_session,
        session_handlers::get_stats,
        session_handlers::clear_session,
        // Admin
        admin_report_handler::list_all_reports,
        admin_report_handler::get_report,
        admin_report_handler::update_report_status,
        admin_report_handler::assign_report,
        admin_report_handler::change_report_department,
        department_user_handler::list_department_users,
        department_user_handler::create_department_user,
        department_user_handler::update_department_user,
        department_user_handler::set_department_user_active,
    ),
    components(
        schemas(
            Meta,
            // Users
            users_models::UserRole,
            users_models::PresenceStatus,
            users_dtos::UserResponseDto,
            users_dtos::UserExistsResponseDto,
            users_dtos::RegisterCitizenDto,
            users_dtos::UpdateProfileDto,
            users_dtos::CreateDepartmentUserDto,
            users_dtos::UpdateDepartmentUserDto,
            users_dtos::SetUserActiveDto,
            users_dtos::UpdatePresenceDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UserExistsResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportPriority,
            reports_models::MediaItem,
            reports_models::TimelineEntry,
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::AssignReportDto,
            reports_dtos::ChangeDepartmentDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Notifications
            notifications_models::NotificationKind,
            notifications_dtos::NotificationResponseDto,
            notifications_dtos::MarkAllReadResponseDto,
            ApiResponse<Vec<notifications_dtos::NotificationResponseDto>>,
            ApiResponse<notifications_dtos::MarkAllReadResponseDto>,
            // Departments
            departments_dtos::DepartmentResponseDto,
            departments_dtos::CreateDepartmentDto,
            departments_dtos::UpdateDepartmentDto,
            ApiResponse<departments_dtos::DepartmentResponseDto>,
            ApiResponse<Vec<departments_dtos::DepartmentResponseDto>>,
            // Session
            session_dtos::ReportStatsDto,
            session_dtos::SessionSnapshotDto,
            ApiResponse<session_dtos::ReportStatsDto>,
            ApiResponse<session_dtos::SessionSnapshotDto>,
        )
    ),
    tags(
        (name = "users", description = "Citizen registration and profiles"),
        (name = "reports", description = "Citizen reports"),
        (name = "notifications", description = "Per-user notifications"),
        (name = "departments", description = "Municipal departments"),
        (name = "session", description = "Cached per-user session state"),
        (name = "admin", description = "Admin endpoints (admin role only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CitizenConnect API",
        version = "0.1.0",
        description = "API documentation for CitizenConnect",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
