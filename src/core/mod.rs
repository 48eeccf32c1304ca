//! Core layer - configuration, errors, extractors, middleware and API docs

pub mod config;
pub mod database;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod openapi;
