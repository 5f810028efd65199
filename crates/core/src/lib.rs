//! Core business logic for sel4c.
//!
//! Services sit between the HTTP layer and the repositories: they validate
//! input, enforce ownership and uniqueness rules, and build the rows that get
//! persisted.

pub mod services;

pub use services::*;
