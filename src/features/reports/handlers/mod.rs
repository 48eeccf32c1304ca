pub mod admin_report_handler;
mod report_handler;

pub use report_handler::*;
