//! Configuration module for the AXL toolkit
//!
//! Handles loading settings from TOML files, falling back to built-in
//! defaults.

pub mod regions;
pub mod settings;

pub use regions::{Location, LocationBundle, Region};
pub use settings::{
    AxlSettings, CredentialSettings, LdapSettings, LoggingSettings, ProvisioningSettings, Settings,
};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from an explicit file, or the default location
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load_default(),
    }
}
