//! AXL Toolkit Library
//!
//! Interactive administration tasks against a Cisco Unified Communications
//! Manager cluster through its AXL SOAP API:
//! - Bulk logout of phones logged into Extension Mobility
//! - Provisioning of a desk phone and/or Jabber client for a user,
//!   including line, user and ownership updates
//!
//! # Usage
//!
//! ```rust,ignore
//! use axl_toolkit::axl::OperationCatalog;
//! use axl_toolkit::credentials::KeyringStore;
//! use axl_toolkit::output::TerminalPrompter;
//! use axl_toolkit::workflow::{logout, Context, SoapConnector};
//! use axl_toolkit::Settings;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let settings = Settings::load_default().unwrap();
//!     let catalog = OperationCatalog::load(&settings.axl.wsdl_path).unwrap();
//!     let connector = SoapConnector::new(catalog, settings.axl.clone(), false);
//!     let ctx = Context {
//!         settings: &settings,
//!         prompter: &TerminalPrompter,
//!         store: &KeyringStore,
//!         connector: &connector,
//!     };
//!     let outcome = logout::run(&ctx).await;
//! }
//! ```

pub mod axl;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod models;
pub mod output;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use utils::{Result, ToolkitError};
