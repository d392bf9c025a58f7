//! # Portal Core
//!
//! Domain entities, repository ports, and services for the identity,
//! session, and entitlement core.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;
