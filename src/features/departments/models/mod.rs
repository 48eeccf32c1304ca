mod department;

pub use department::{Department, DEFAULT_DEPARTMENTS};
