//! Operator-facing terminal interaction

pub mod interactive;

pub use interactive::{init_theme, Prompter, TerminalPrompter};
