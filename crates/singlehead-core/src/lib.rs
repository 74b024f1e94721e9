//! Singlehead Core
//!
//! Shared error and configuration types for the singlehead amalgamator.

pub mod config;
pub mod error;

pub use config::{Config, Markers, VersionConfig};
pub use error::{Error, Result};
