//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the document store abstraction and its backends.

pub mod document_store;
