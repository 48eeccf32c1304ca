//! Citizen reports: filing, editing under the status gate, and admin triage.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;

pub use services::ReportService;
