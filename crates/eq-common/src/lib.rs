//! Shared types for eqstats.
//!
//! This crate provides the pieces used by every other eqstats crate:
//! - The unified error type with stable codes and categories
//! - Analysis configuration (defaults, TOML loading, validation)

pub mod config;
pub mod error;

pub use config::{AnalysisConfig, OmoriDefaults};
pub use error::{Error, ErrorCategory, Result, StructuredError};
