//! Shared types and models for the UNA Stock Management Platform
//!
//! This crate contains the domain types shared between the backend services,
//! the HTTP layer, and the test suites: document and stock models, document
//! arithmetic, and Moldova-specific validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
