//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - `Amount`, an exact decimal money value
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use crate::config::{AppConfig, BankConfig, SecurityConfig};
pub use error::{AppError, AppResult};
