//! Bulk Extension Mobility logout
//!
//! Lists every phone, keeps the ones with a logged-in profile, asks the
//! operator once, then logs each phone out. A failure on one phone is
//! recorded and the loop moves on to the next.

use super::{selection, step_failed, Connector, Context};
use crate::axl::AxlApi;
use crate::models::logged_in_phone_names;
use crate::output::Prompter;
use crate::utils::progress::{create_spinner, print_fail, print_header, print_info, print_pass};
use crate::utils::WorkflowError;

/// A phone that could not be logged out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutFailure {
    pub device: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoutReport {
    /// Logged-in phones, in listing order
    pub candidates: Vec<String>,
    pub logged_out: Vec<String>,
    pub failures: Vec<LogoutFailure>,
}

impl LogoutReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// No phone was logged in
    NothingToDo,
    Completed(LogoutReport),
}

/// Resolve credentials, pick the cluster and run the logout
pub async fn run<C: Connector>(ctx: &Context<'_, C>) -> Result<LogoutOutcome, WorkflowError> {
    print_header("Bulk Extension Mobility logout");
    let credentials = ctx.credentials(false)?;
    let operator = credentials.username().to_string();
    tracing::info!(operator = %operator, "Bulk logout started");

    let region = selection::select_region(ctx.prompter, &ctx.settings.regions)?;
    let api = ctx
        .connector
        .connect(&region.endpoint(), &credentials)
        .map_err(|e| step_failed(&operator, "connect", e))?;

    execute(&api, ctx.prompter, &operator).await
}

/// The logout itself, against an already connected API
pub async fn execute<A: AxlApi + ?Sized>(
    api: &A,
    prompter: &dyn Prompter,
    operator: &str,
) -> Result<LogoutOutcome, WorkflowError> {
    let spinner = create_spinner("Listing phones...");
    let listing = api.list_phones("%").await;
    spinner.finish_and_clear();
    let phones = listing.map_err(|e| step_failed(operator, "listPhone", e))?;

    let candidates = logged_in_phone_names(&phones);
    if candidates.is_empty() {
        print_info("No phones are logged into Extension Mobility");
        tracing::info!(operator, "Bulk logout: no logged-in phones");
        return Ok(LogoutOutcome::NothingToDo);
    }

    print_info(&format!(
        "{} of {} phones are logged into Extension Mobility",
        candidates.len(),
        phones.len()
    ));
    let confirmed = prompter.confirm(
        &format!("Log out all {} phones?", candidates.len()),
        false,
    )?;
    if !confirmed {
        tracing::info!(operator, "Bulk logout declined");
        return Err(WorkflowError::aborted("bulk logout declined"));
    }

    let mut report = LogoutReport {
        candidates: candidates.clone(),
        ..LogoutReport::default()
    };

    for device in candidates {
        match api.do_device_logout(&device).await {
            Ok(()) => {
                tracing::info!(operator, device = %device, "Logged out of Extension Mobility");
                print_pass(&format!("Logged out {}", device));
                report.logged_out.push(device);
            }
            Err(e) => {
                tracing::error!(operator, device = %device, fault = %e, "Logout failed");
                print_fail(&format!("{}: {}", device, e));
                report.failures.push(LogoutFailure {
                    device,
                    message: e.to_string(),
                });
            }
        }
    }

    print_summary(&report);
    tracing::info!(
        operator,
        logged_out = report.logged_out.len(),
        failed = report.failures.len(),
        "Bulk logout finished"
    );
    Ok(LogoutOutcome::Completed(report))
}

fn print_summary(report: &LogoutReport) {
    print_header("Summary");
    print_pass(&format!(
        "{} of {} phones logged out",
        report.logged_out.len(),
        report.candidates.len()
    ));
    for failure in &report.failures {
        print_fail(&format!("{}: {}", failure.device, failure.message));
    }
}
