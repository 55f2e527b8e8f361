//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig)
//! - [`limits`]: Session limits (LimitsConfig)
//! - [`seed`]: Accounts created at startup (SeedUser, SeedContact)
//! - [`validation`]: Startup checks over a loaded config

mod defaults;
mod limits;
mod seed;
mod types;
pub mod validation;

pub use limits::LimitsConfig;
pub use seed::{SeedContact, SeedUser};
pub use types::{Config, ConfigError, ServerConfig};
