mod report;

pub use report::{MediaItem, Report, ReportPriority, ReportStatus, TimelineEntry};
