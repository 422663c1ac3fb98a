//! Region, location and build-intent prompts

use crate::config::{LocationBundle, ProvisioningSettings, Region};
use crate::models::{
    BuildTarget, BuildType, DeskPhone, DeskPhoneModel, MacAddress, PhoneBuildRequest,
};
use crate::output::Prompter;
use crate::utils::progress::{print_info, print_warning};
use crate::utils::WorkflowError;

/// Menu selection that re-asks until the answer is one of the options
pub(crate) fn choose(
    prompter: &dyn Prompter,
    message: &str,
    options: &[String],
) -> Result<usize, WorkflowError> {
    loop {
        let index = prompter.select(message, options)?;
        if index < options.len() {
            return Ok(index);
        }
        print_warning("Invalid selection, please choose one of the listed options");
    }
}

pub fn select_region<'r>(
    prompter: &dyn Prompter,
    regions: &'r [Region],
) -> Result<&'r Region, WorkflowError> {
    let names: Vec<String> = regions.iter().map(|r| r.name.clone()).collect();
    let index = choose(
        prompter,
        "Please select regional CUCM you'd like to work with:",
        &names,
    )?;
    Ok(&regions[index])
}

/// Pick a location of `region` and resolve it into a bundle
pub fn select_location(
    prompter: &dyn Prompter,
    region: &Region,
) -> Result<LocationBundle, WorkflowError> {
    let names: Vec<String> = region.locations.iter().map(|l| l.name.clone()).collect();
    let index = choose(
        prompter,
        "Please select the location for this phone setup:",
        &names,
    )?;
    let location = &region.locations[index];
    if let Some(notice) = &location.notice {
        print_info(notice);
    }
    Ok(region.bundle(location))
}

/// Ask for a MAC address until it parses, at most `max_attempts` times
pub fn prompt_mac(prompter: &dyn Prompter, max_attempts: u32) -> Result<MacAddress, WorkflowError> {
    for attempt in 1..=max_attempts {
        let input = prompter.text("Please enter the MAC address of the desk phone:")?;
        match input.parse::<MacAddress>() {
            Ok(mac) => return Ok(mac),
            Err(e) => {
                let remaining = max_attempts - attempt;
                print_warning(&format!("{} ({} attempt(s) left)", e, remaining));
            }
        }
    }
    Err(WorkflowError::InvalidMac {
        attempts: max_attempts,
    })
}

fn prompt_desk_phone(
    prompter: &dyn Prompter,
    settings: &ProvisioningSettings,
) -> Result<DeskPhone, WorkflowError> {
    let input = prompter.text("Please enter the model of the desk phone (e.g. 7942):")?;
    let model = DeskPhoneModel::new(&input)
        .ok_or_else(|| WorkflowError::aborted("no desk phone model entered"))?;
    let mac = prompt_mac(prompter, settings.max_mac_attempts)?;
    Ok(DeskPhone { model, mac })
}

/// Gather user, extension and build type for the selected location
pub fn collect_intent(
    prompter: &dyn Prompter,
    settings: &ProvisioningSettings,
    location: LocationBundle,
) -> Result<PhoneBuildRequest, WorkflowError> {
    let username =
        prompter.text("Please enter the username of the person for the phone setup:")?;
    let extension = prompter.text("Please enter the extension for the phone setup:")?;

    let labels: Vec<String> = BuildType::ALL.iter().map(ToString::to_string).collect();
    let index = choose(prompter, "Please select the type of phone build:", &labels)?;

    let target = match BuildType::ALL[index] {
        BuildType::DeskPhone => BuildTarget::DeskPhone(prompt_desk_phone(prompter, settings)?),
        BuildType::SoftClient => BuildTarget::SoftClient,
        BuildType::Both => BuildTarget::Both(prompt_desk_phone(prompter, settings)?),
    };

    Ok(PhoneBuildRequest {
        username: username.trim().to_string(),
        extension: extension.trim().to_string(),
        target,
        location,
    })
}
