//! AXL Toolkit - interactive CUCM administration
//!
//! `axl-toolkit logout` logs every phone out of Extension Mobility,
//! `axl-toolkit provision` builds a desk phone and/or Jabber for a user, and
//! with no subcommand a menu offers both.

use anyhow::Context as _;
use axl_toolkit::axl::OperationCatalog;
use axl_toolkit::cli::{prompt_main_menu, Cli, Commands, MainMenuAction};
use axl_toolkit::credentials::KeyringStore;
use axl_toolkit::output::{init_theme, Prompter, TerminalPrompter};
use axl_toolkit::utils::progress::print_warning;
use axl_toolkit::utils::{logging, PromptError, WorkflowError};
use axl_toolkit::workflow::{logout, provision, Context, SoapConnector};
use axl_toolkit::{config, Settings};
use clap::Parser;
use console::style;
use std::process::ExitCode;

const EXIT_CANCELLED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }
    init_theme();

    let settings = match config::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => return fail(&anyhow::Error::new(e)),
    };

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| settings.logging.file.clone());
    let _guard = match logging::init(&log_file) {
        Ok(guard) => guard,
        Err(e) => return fail(&anyhow::Error::new(e)),
    };

    match run(&cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let prompter = TerminalPrompter;

    let command = match cli.command {
        Some(command) => command,
        None => match prompt_main_menu(&prompter).map_err(WorkflowError::from)? {
            MainMenuAction::Logout => Commands::Logout,
            MainMenuAction::Provision => Commands::Provision,
            MainMenuAction::Quit => return Ok(()),
        },
    };

    let catalog = OperationCatalog::load(&settings.axl.wsdl_path)
        .context("AXL schema is required; copy AXLAPI.wsdl from the AXL SQL toolkit")?;
    tracing::debug!(operations = catalog.len(), "Loaded AXL operation catalog");

    let connector = SoapConnector::new(catalog, settings.axl.clone(), cli.debug);
    let ctx = Context {
        settings,
        prompter: &prompter,
        store: &KeyringStore,
        connector: &connector,
    };

    match command {
        Commands::Logout => {
            logout::run(&ctx).await?;
            prompter.pause("Press Enter to exit...").map_err(WorkflowError::from)?;
        }
        Commands::Provision => {
            provision::run(&ctx).await?;
        }
    }
    Ok(())
}

/// Exit status for a failed run; operator stops are not errors
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<WorkflowError>() {
        Some(WorkflowError::Prompt(PromptError::Cancelled)) => {
            tracing::info!("Cancelled by operator");
            eprintln!("{}", style("Cancelled").yellow());
            ExitCode::from(EXIT_CANCELLED)
        }
        Some(WorkflowError::Aborted { reason }) => {
            tracing::info!(reason = %reason, "Stopped by operator");
            print_warning(&format!("Stopped: {}", reason));
            wait_for_enter();
            ExitCode::SUCCESS
        }
        _ => {
            tracing::error!(error = %format!("{:#}", err), "Run failed");
            fail(err)
        }
    }
}

fn fail(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {:#}", style("Error:").red().bold(), err);
    wait_for_enter();
    ExitCode::FAILURE
}

fn wait_for_enter() {
    let _ = TerminalPrompter.pause("Press Enter to exit...");
}
