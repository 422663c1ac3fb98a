//! Interactive prompts using inquire
//!
//! Workflows only see the [`Prompter`] trait; [`TerminalPrompter`] is the
//! terminal implementation used by the binary.

use crate::utils::PromptError;
use console::{style, Term};
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Select, Text};

/// Operator interaction used by the workflows
pub trait Prompter {
    /// Pick one of `options`; returns its index
    fn select(&self, message: &str, options: &[String]) -> Result<usize, PromptError>;

    /// Free text, trimmed
    fn text(&self, message: &str) -> Result<String, PromptError>;

    /// Hidden entry for usernames and passwords
    fn secret(&self, message: &str) -> Result<String, PromptError>;

    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;

    /// Wait for Enter
    fn pause(&self, message: &str) -> Result<(), PromptError>;
}

/// Initialize the global inquire theme (Tokyo Night Storm palette).
/// Call once at startup before any prompts.
pub fn init_theme() {
    inquire::set_global_render_config(render_config());
}

fn render_config() -> RenderConfig<'static> {
    let primary = Color::rgb(122, 162, 247);
    let green = Color::rgb(158, 206, 106);
    let foreground = Color::rgb(192, 202, 245);
    let muted = Color::rgb(86, 95, 137);
    let purple = Color::rgb(187, 154, 247);
    let red = Color::rgb(247, 118, 142);

    let mut config = RenderConfig::empty();
    config.prompt_prefix = Styled::new("❯").with_fg(primary);
    config.answered_prompt_prefix = Styled::new("✓").with_fg(green);
    config.prompt = StyleSheet::new()
        .with_fg(foreground)
        .with_attr(Attributes::BOLD);
    config.answer = StyleSheet::new().with_fg(green);
    config.default_value = StyleSheet::new().with_fg(muted);
    config.help_message = StyleSheet::new().with_fg(muted);
    config.text_input = StyleSheet::new().with_fg(foreground);
    config.highlighted_option_prefix = Styled::new("❯").with_fg(purple);
    config.selected_option = Some(StyleSheet::new().with_fg(purple));
    config.error_message = config
        .error_message
        .with_prefix(Styled::new("✗").with_fg(red))
        .with_message(StyleSheet::new().with_fg(red));
    config.canceled_prompt_indicator = Styled::new("canceled").with_fg(muted);
    config
}

fn prompt_error(err: InquireError) -> PromptError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            PromptError::Cancelled
        }
        other => PromptError::Terminal {
            message: other.to_string(),
        },
    }
}

/// Prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&self, message: &str, options: &[String]) -> Result<usize, PromptError> {
        println!();
        let choice = Select::new(message, options.to_vec())
            .with_page_size(10)
            .raw_prompt()
            .map_err(prompt_error)?;
        Ok(choice.index)
    }

    fn text(&self, message: &str) -> Result<String, PromptError> {
        let answer = Text::new(message)
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid("A value is required".into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt()
            .map_err(prompt_error)?;
        Ok(answer.trim().to_string())
    }

    fn secret(&self, message: &str) -> Result<String, PromptError> {
        dialoguer::Password::new()
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PromptError::Terminal {
                message: e.to_string(),
            })
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn pause(&self, message: &str) -> Result<(), PromptError> {
        println!("{}", style(message).dim());
        Term::stdout()
            .read_line()
            .map(|_| ())
            .map_err(|e| PromptError::Terminal {
                message: e.to_string(),
            })
    }
}
