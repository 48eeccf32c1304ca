mod session_cache;

pub use session_cache::{ReportStats, SessionCache, UserSession};
