//! # Nexus Common Library
//!
//! Shared code for the Nexus services including:
//! - Error taxonomy
//! - Unified assignment model and persistence row shape
//! - Configuration loading and root folder resolution
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{AssignmentRow, Source, UnifiedAssignment};
