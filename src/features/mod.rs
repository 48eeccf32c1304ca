//! Features layer - one module per domain area

pub mod auth;
pub mod departments;
pub mod notifications;
pub mod reports;
pub mod session;
pub mod users;
