//! HTTP handlers

pub mod auth;
pub mod features;
pub mod health;
pub mod subscriptions;
pub mod tenants;
pub mod users;
