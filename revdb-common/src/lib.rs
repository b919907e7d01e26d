//! # revdb Common Library
//!
//! Shared code for the revdb review-aggregation service:
//! - Database initialization, schema, and row models
//! - Error types
//! - Configuration loading
//! - Password hashing and session token helpers

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
