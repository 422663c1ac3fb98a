//! Command-line interface module
//!
//! Argument parsing with clap, and the main menu shown when no subcommand
//! is given.

pub mod args;

pub use args::{Cli, Commands};

use crate::output::Prompter;
use crate::utils::PromptError;

/// Main menu choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuAction {
    Logout,
    Provision,
    Quit,
}

/// Show the main menu and return the operator's choice
pub fn prompt_main_menu(prompter: &dyn Prompter) -> Result<MainMenuAction, PromptError> {
    let items = vec![
        "Log all phones out of Extension Mobility".to_string(),
        "Provision a desk phone / Jabber for a user".to_string(),
        "Quit".to_string(),
    ];

    Ok(match prompter.select("What would you like to do?", &items)? {
        0 => MainMenuAction::Logout,
        1 => MainMenuAction::Provision,
        _ => MainMenuAction::Quit,
    })
}
