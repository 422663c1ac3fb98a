//! Custom error types for the AXL toolkit
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of the CUCM workflows: transport and SOAP faults,
//! credential storage, configuration and operator interaction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up the process itself
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the AXL SOAP service
#[derive(Error, Debug)]
pub enum AxlError {
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AXL endpoint returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("{message}")]
    Fault { message: String, code: Option<u32> },

    #[error("Malformed AXL response: {message}")]
    MalformedResponse { message: String },

    #[error("XML error: {message}")]
    Xml { message: String },

    #[error("Failed to load WSDL {path}: {message}")]
    Wsdl { path: PathBuf, message: String },

    #[error("Operation {operation} is not defined in the WSDL")]
    UnknownOperation { operation: String },

    #[error("Failed to load certificate {path}: {message}")]
    Certificate { path: PathBuf, message: String },
}

impl AxlError {
    /// Shorthand for a server-side SOAP fault
    pub fn fault(message: impl Into<String>) -> Self {
        AxlError::Fault {
            message: message.into(),
            code: None,
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        AxlError::Xml {
            message: err.to_string(),
        }
    }
}

/// Credential store errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential store failure for {service}: {message}")]
    Store { service: String, message: String },

    #[error("No {what} entered")]
    Empty { what: &'static str },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Operator interaction errors
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Operation cancelled by operator")]
    Cancelled,

    #[error("Terminal interaction failed: {message}")]
    Terminal { message: String },
}

/// Errors that end a workflow run
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Aborted: {reason}")]
    Aborted { reason: String },

    #[error("Invalid MAC address entered {attempts} times")]
    InvalidMac { attempts: u32 },

    #[error("LDAP sync did not complete after {attempts} status checks (last status: {})", last_status.as_deref().unwrap_or("none"))]
    LdapSyncTimeout {
        attempts: u32,
        last_status: Option<String>,
    },

    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: AxlError,
    },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl WorkflowError {
    pub fn aborted(reason: impl Into<String>) -> Self {
        WorkflowError::Aborted {
            reason: reason.into(),
        }
    }

    /// True when the operator chose to stop rather than something failing
    pub fn is_operator_exit(&self) -> bool {
        matches!(
            self,
            WorkflowError::Aborted { .. } | WorkflowError::Prompt(PromptError::Cancelled)
        )
    }
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
