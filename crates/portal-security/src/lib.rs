//! # Portal Security
//!
//! Credential store: salt generation, password hashing, verification.

pub mod password;

pub use password::{PasswordError, PasswordService};
