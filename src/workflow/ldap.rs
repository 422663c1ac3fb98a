//! Directory sync before a user is read
//!
//! The sync is started with `doLdapSync`, then its status is polled at a
//! fixed interval. Polling stops at the configured success text or after
//! `max_attempts` checks, whichever comes first.

use super::step_failed;
use crate::axl::AxlApi;
use crate::config::LdapSettings;
use crate::utils::progress::{create_spinner, print_pass, print_warning};
use crate::utils::{AxlError, WorkflowError};

fn status_fault_notice(attempt: u32, max_attempts: u32, err: &AxlError) -> String {
    format!(
        "LDAP sync status check {}/{} failed: {}",
        attempt, max_attempts, err
    )
}

pub async fn sync_directory<A: AxlApi + ?Sized>(
    api: &A,
    settings: &LdapSettings,
    operator: &str,
) -> Result<(), WorkflowError> {
    let directory = settings.directory_name.as_str();
    api.do_ldap_sync(directory)
        .await
        .map_err(|e| step_failed(operator, "doLdapSync", e))?;
    tracing::info!(operator, directory, "LDAP sync started");

    let spinner = create_spinner("Waiting for LDAP sync to complete...");
    let mut last_status = None;

    for attempt in 1..=settings.max_attempts {
        tokio::time::sleep(settings.poll_interval()).await;

        match api.get_ldap_sync_status(directory).await {
            Ok(status) if status.trim() == settings.success_status => {
                spinner.finish_and_clear();
                print_pass(&format!("LDAP sync of {} complete", directory));
                tracing::info!(operator, directory, attempt, "LDAP sync complete");
                return Ok(());
            }
            Ok(status) => {
                spinner.set_message(format!(
                    "LDAP sync: {} ({}/{})",
                    status.trim(),
                    attempt,
                    settings.max_attempts
                ));
                last_status = Some(status.trim().to_string());
            }
            Err(e) => {
                tracing::warn!(operator, directory, attempt, fault = %e, "LDAP sync status check failed");
                let notice = status_fault_notice(attempt, settings.max_attempts, &e);
                spinner.suspend(|| print_warning(&notice));
            }
        }
    }

    spinner.finish_and_clear();
    tracing::error!(
        operator,
        directory,
        attempts = settings.max_attempts,
        "LDAP sync did not complete"
    );
    Err(WorkflowError::LdapSyncTimeout {
        attempts: settings.max_attempts,
        last_status,
    })
}
