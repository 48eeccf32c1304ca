mod session_handler;

pub use session_handler::*;
