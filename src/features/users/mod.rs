//! User profiles and roles.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/exists/{phone}` | Whether a phone number is registered (public) |
//! | POST | `/api/users/register` | Register the caller as a citizen |
//! | GET | `/api/me` | Caller's profile |
//! | PATCH | `/api/me` | Update name/phone |
//! | PATCH | `/api/users/presence` | Record presence |
//! | GET/POST | `/api/admin/department-users` | List/create department users |
//! | PATCH | `/api/admin/department-users/{id}` | Update a department user |
//! | PATCH | `/api/admin/department-users/{id}/active` | Enable/disable a department user |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
