//! Utility modules for the AXL toolkit
//!
//! This module contains error types, logging setup, progress indicators and
//! other utilities.

pub mod error;
pub mod logging;
pub mod progress;

pub use error::{
    AxlError, ConfigError, CredentialError, PromptError, Result, ToolkitError, WorkflowError,
};
