//! # Portal Shared
//!
//! Shared utilities, types, configuration, and telemetry for the portal backend.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;
pub mod types;
pub mod validation;

pub use error::AppError;
pub use types::*;
