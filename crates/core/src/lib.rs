//! Core types and shared functionality for scour.
//!
//! This crate provides:
//! - The volatile cache layer (extracted text, known failures, URL verdicts)
//! - Unified error types
//! - Layered configuration with fast/deep profiles

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheLayer, CacheStats};
pub use config::{AppConfig, ConfigError, Confinement, Profile};
pub use error::Error;
