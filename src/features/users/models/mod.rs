mod user;

pub use user::{PresenceStatus, User, UserRole};
