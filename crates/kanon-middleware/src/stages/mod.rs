//! Middleware stages.
//!
//! - [`validation`] - Request segment validation

pub mod validation;

// Re-export main types
pub use validation::{ValidationBuilder, ValidationMiddleware};
