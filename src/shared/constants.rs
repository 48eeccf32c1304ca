/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REPORT DEFAULTS
// =============================================================================

/// Stored location when the citizen gives none
pub const DEFAULT_REPORT_LOCATION: &str = "Unknown";

/// Timeline field name on report documents
pub const TIMELINE_FIELD: &str = "timeline";

// =============================================================================
// NOTIFICATION TEMPLATE KEYS
// =============================================================================

/// Title/message keys are resolved to text by the client
pub const NOTIFY_REPORT_SUBMITTED_TITLE: &str = "reportSubmitted";
pub const NOTIFY_REPORT_SUBMITTED_MESSAGE: &str = "reportSubmittedMsg";
pub const NOTIFY_REPORT_UPDATE_TITLE: &str = "reportUpdate";
pub const NOTIFY_REPORT_UPDATE_MESSAGE: &str = "reportStatusUpdateMsg";
