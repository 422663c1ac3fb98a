//! Desk phone and Jabber provisioning
//!
//! Steps, in order: region and location, build intent, connect and look up
//! the extension (with credential reset on authentication faults), handle
//! devices already on the line, LDAP sync, read the user, confirm, add the
//! device(s) and update the line, update the user in two passes, set the
//! owner of every new device.

use super::{ldap, selection, step_failed, Connector, Context};
use crate::axl::{AxlApi, FaultKind, LineUpdate, PhonePayload, UserUpdate};
use crate::config::ProvisioningSettings;
use crate::credentials::Credentials;
use crate::models::{BuildPlan, LineInfo, PhoneBuildRequest, UserRecord};
use crate::output::Prompter;
use crate::utils::progress::{print_fail, print_header, print_info, print_pass, print_warning};
use crate::utils::WorkflowError;

const PAUSE: &str = "Press Enter to continue...";

/// What a finished provisioning run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub plan: BuildPlan,
    /// Devices removed from the line at the operator's request
    pub removed: Vec<String>,
    pub created: Vec<String>,
    /// The user's device associations after the update
    pub user_devices: Vec<String>,
    pub followup_tasks: Vec<String>,
}

pub async fn run<C: Connector>(ctx: &Context<'_, C>) -> Result<ProvisionSummary, WorkflowError> {
    print_header("Phone provisioning");
    let credentials = ctx.credentials(false)?;

    let region = selection::select_region(ctx.prompter, &ctx.settings.regions)?;
    let location = selection::select_location(ctx.prompter, region)?;
    let request = selection::collect_intent(ctx.prompter, &ctx.settings.provisioning, location)?;

    let (api, credentials, line) = connect_and_check(ctx, &request, credentials).await?;
    let operator = credentials.username();
    tracing::info!(
        operator,
        user = %request.username,
        extension = %request.extension,
        build = %request.target.build_type(),
        location = %request.location.location,
        "Provisioning started"
    );

    let removed = handle_existing_devices(&api, ctx.prompter, &line, operator).await?;
    ldap::sync_directory(&api, &ctx.settings.ldap, operator).await?;

    let user = fetch_user(&api, &request.username, operator).await?;
    let plan = BuildPlan::new(request, &user);
    confirm_build(ctx.prompter, &plan)?;

    let created = build_devices(&api, ctx.prompter, &plan, operator).await?;
    let user_devices = update_user(&api, &ctx.settings.provisioning, &plan, operator).await?;
    update_ownership(&api, &plan, &created, operator).await?;

    let summary = ProvisionSummary {
        plan,
        removed,
        created,
        user_devices,
        followup_tasks: ctx.settings.provisioning.followup_tasks.clone(),
    };
    finish(ctx.prompter, &summary, operator)?;
    Ok(summary)
}

/// Connect and look up the extension. An authentication fault offers a
/// credential reset and starts over with the new credentials.
pub async fn connect_and_check<C: Connector>(
    ctx: &Context<'_, C>,
    request: &PhoneBuildRequest,
    mut credentials: Credentials,
) -> Result<(C::Api, Credentials, LineInfo), WorkflowError> {
    let endpoint = request.location.endpoint();
    let partition = request.location.route_partition.as_str();

    loop {
        let operator = credentials.username().to_string();
        let api = ctx
            .connector
            .connect(&endpoint, &credentials)
            .map_err(|e| step_failed(&operator, "connect", e))?;

        let err = match api.get_line(&request.extension, partition).await {
            Ok(line) => return Ok((api, credentials, line)),
            Err(e) => e,
        };

        let kind = FaultKind::classify(&err);
        if !kind.is_recoverable() {
            return Err(step_failed(&operator, "getLine", err));
        }

        if kind == FaultKind::LineNotFound {
            tracing::warn!(
                operator = %operator,
                extension = %request.extension,
                partition,
                "Extension not found"
            );
            print_warning(&format!(
                "Extension {} was not found in partition {}",
                request.extension, partition
            ));
            if ctx.prompter.confirm("Would you like to create the line?", false)? {
                print_info(
                    "Line creation is not supported; add the directory number in CUCM and run again",
                );
            }
            return Err(WorkflowError::aborted(format!(
                "extension {} does not exist",
                request.extension
            )));
        }

        tracing::warn!(operator = %operator, fault = %err, "Authentication failed");
        print_fail(&format!("Authentication failed: {}", err));
        if !ctx
            .prompter
            .confirm("Reset the stored CUCM credentials and try again?", true)?
        {
            return Err(step_failed(&operator, "getLine", err));
        }
        credentials = ctx.credentials(true)?;
    }
}

/// Devices already on the line: keep them, delete them, or stop.
/// Returns the devices that were removed.
pub async fn handle_existing_devices<A: AxlApi + ?Sized>(
    api: &A,
    prompter: &dyn Prompter,
    line: &LineInfo,
    operator: &str,
) -> Result<Vec<String>, WorkflowError> {
    if line.associated_devices.is_empty() {
        return Ok(Vec::new());
    }

    print_warning(&format!(
        "Extension {} is already associated with: {}",
        line.pattern,
        line.associated_devices.join(", ")
    ));
    let options = [
        "Continue and add another device".to_string(),
        "Delete the existing device(s)".to_string(),
        "Quit".to_string(),
    ];

    match selection::choose(prompter, "What would you like to do?", &options)? {
        0 => Ok(Vec::new()),
        1 => {
            let confirmed = prompter.confirm(
                &format!(
                    "Permanently delete {}?",
                    line.associated_devices.join(", ")
                ),
                false,
            )?;
            if !confirmed {
                return Err(WorkflowError::aborted("existing devices kept"));
            }

            let mut removed = Vec::new();
            for device in &line.associated_devices {
                api.remove_phone(device)
                    .await
                    .map_err(|e| step_failed(operator, "removePhone", e))?;
                tracing::info!(operator, device = %device, "Device removed");
                print_pass(&format!("Removed {}", device));
                removed.push(device.clone());
            }
            Ok(removed)
        }
        _ => Err(WorkflowError::aborted("operator quit at existing devices")),
    }
}

async fn fetch_user<A: AxlApi + ?Sized>(
    api: &A,
    userid: &str,
    operator: &str,
) -> Result<UserRecord, WorkflowError> {
    let user = api
        .get_user(userid)
        .await
        .map_err(|e| step_failed(operator, "getUser", e))?;
    print_info(&format!("Found user {} ({})", user.full_name(), userid));
    Ok(user)
}

fn confirm_build(prompter: &dyn Prompter, plan: &BuildPlan) -> Result<(), WorkflowError> {
    let request = &plan.request;
    print_header("Build summary");
    print_info(&format!("User:        {}", request.username));
    print_info(&format!("Extension:   {}", request.extension));
    print_info(&format!("Description: {}", plan.description));
    print_info(&format!("Display:     {}", plan.display_name));
    print_info(&format!(
        "Location:    {} / {}",
        request.location.region, request.location.location
    ));
    if let Some(desk) = request.target.desk_phone() {
        print_info(&format!(
            "Desk phone:  {} ({}, {})",
            desk.device_name(),
            desk.model.product(),
            desk.model.protocol()
        ));
    }
    if let Some(name) = request.soft_client_name() {
        print_info(&format!("Jabber:      {}", name));
    }

    if prompter.confirm(&format!("Build {}?", plan.summary()), true)? {
        Ok(())
    } else {
        Err(WorkflowError::aborted("build not confirmed"))
    }
}

async fn add_device<A: AxlApi + ?Sized>(
    api: &A,
    prompter: &dyn Prompter,
    plan: &BuildPlan,
    payload: &PhonePayload,
    operator: &str,
) -> Result<(), WorkflowError> {
    if let Err(e) = api.add_phone(payload).await {
        if FaultKind::classify(&e) == FaultKind::DuplicateDevice {
            print_warning(&format!("A device named {} already exists", payload.name));
        }
        return Err(step_failed(operator, "addPhone", e));
    }
    tracing::info!(operator, device = %payload.name, product = %payload.product, "Device created");
    print_pass(&format!("Created {} ({})", payload.name, payload.product));
    prompter.pause(PAUSE)?;

    let update = LineUpdate::from_plan(plan);
    api.update_line(&update)
        .await
        .map_err(|e| step_failed(operator, "updateLine", e))?;
    tracing::info!(operator, extension = %update.pattern, "Line updated");
    print_pass(&format!("Updated line {}", update.pattern));
    prompter.pause(PAUSE)?;
    Ok(())
}

/// Add the desk phone and/or soft client; returns the created device names
async fn build_devices<A: AxlApi + ?Sized>(
    api: &A,
    prompter: &dyn Prompter,
    plan: &BuildPlan,
    operator: &str,
) -> Result<Vec<String>, WorkflowError> {
    let mut payloads = Vec::new();
    if let Some(desk) = plan.request.target.desk_phone() {
        payloads.push(PhonePayload::desk_phone(plan, desk));
    }
    if plan.request.target.build_type().includes_soft_client() {
        payloads.push(PhonePayload::soft_client(plan));
    }

    let mut created = Vec::new();
    for payload in &payloads {
        add_device(api, prompter, plan, payload, operator).await?;
        created.push(payload.name.clone());
    }
    Ok(created)
}

/// Two `updateUser` calls: associations first, primary extension second.
/// The device list is re-read and only ever extended.
async fn update_user<A: AxlApi + ?Sized>(
    api: &A,
    settings: &ProvisioningSettings,
    plan: &BuildPlan,
    operator: &str,
) -> Result<Vec<String>, WorkflowError> {
    let request = &plan.request;
    let current = api
        .get_user(&request.username)
        .await
        .map_err(|e| step_failed(operator, "getUser", e))?;
    let devices = current.devices_with(&request.device_names());

    let associations = UserUpdate {
        userid: request.username.clone(),
        user_locale: request.location.user_locale.clone(),
        home_cluster: Some(true),
        im_and_presence: request
            .target
            .build_type()
            .includes_soft_client()
            .then_some(true),
        enable_cti: Some(true),
        associated_devices: Some(devices.clone()),
        associated_groups: Some(settings.user_groups.clone()),
        primary_extension: None,
    };
    api.update_user(&associations)
        .await
        .map_err(|e| step_failed(operator, "updateUser", e))?;
    tracing::info!(
        operator,
        user = %request.username,
        devices = %devices.join(","),
        "User devices and groups updated"
    );
    print_pass(&format!("Associated {} with {}", devices.join(", "), request.username));

    let primary = UserUpdate {
        userid: request.username.clone(),
        primary_extension: Some((
            request.extension.clone(),
            request.location.route_partition.clone(),
        )),
        ..UserUpdate::default()
    };
    api.update_user(&primary)
        .await
        .map_err(|e| step_failed(operator, "updateUser (primary extension)", e))?;
    tracing::info!(
        operator,
        user = %request.username,
        extension = %request.extension,
        "Primary extension set"
    );
    print_pass(&format!("Primary extension set to {}", request.extension));

    Ok(devices)
}

async fn update_ownership<A: AxlApi + ?Sized>(
    api: &A,
    plan: &BuildPlan,
    created: &[String],
    operator: &str,
) -> Result<(), WorkflowError> {
    let owner = plan.request.username.as_str();
    for device in created {
        api.update_phone_owner(device, owner)
            .await
            .map_err(|e| step_failed(operator, "updatePhone", e))?;
        tracing::info!(operator, device = %device, owner, "Owner updated");
        print_pass(&format!("{} is now owned by {}", device, owner));
    }
    Ok(())
}

fn finish(
    prompter: &dyn Prompter,
    summary: &ProvisionSummary,
    operator: &str,
) -> Result<(), WorkflowError> {
    print_header("Done");
    print_pass(&summary.plan.summary());
    if !summary.followup_tasks.is_empty() {
        print_header("Remaining manual steps");
        for task in &summary.followup_tasks {
            print_info(task);
        }
    }
    tracing::info!(
        operator,
        user = %summary.plan.request.username,
        devices = %summary.created.join(","),
        "Provisioning finished"
    );
    prompter.pause("Press Enter to exit...")?;
    Ok(())
}
