//! Core types for the BTC spot price aggregator
//!
//! This crate provides shared types used across all components:
//! - Provider identifiers and their endpoints
//! - The quote entity
//! - Feed configuration
//! - Error types

pub mod types;
pub mod quotes;
pub mod config;
pub mod errors;

pub use types::*;
pub use quotes::*;
pub use config::*;
pub use errors::*;
