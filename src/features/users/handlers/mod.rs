pub mod department_user_handler;
mod user_handler;

pub use user_handler::*;
