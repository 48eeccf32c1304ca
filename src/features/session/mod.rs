//! Per-user session cache.
//!
//! Holds each signed-in user's reports and notifications plus the shared
//! department list. Feature handlers patch it after successful writes.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/session` | Cached snapshot (loaded on first access) |
//! | DELETE | `/api/session` | Drop the cached entry |
//! | POST | `/api/session/refresh` | Reload from the store |
//! | GET | `/api/session/stats` | Report counts |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::SessionCache;
