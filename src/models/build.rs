//! Phone build requests
//!
//! Device naming, MAC address normalization and the rules that map a desk
//! phone model to its signalling protocol, security profile and template.

use super::user::UserRecord;
use crate::config::LocationBundle;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Device name prefix for desk phones
pub const DESK_PHONE_PREFIX: &str = "SEP";
/// Device name prefix for soft clients
pub const SOFT_CLIENT_PREFIX: &str = "csf";

/// Models whose template name carries a trailing `G`
const LEGACY_G_MODELS: [&str; 2] = ["7942", "7962"];
/// Model series that register over SIP
const SIP_SERIES: [&str; 2] = ["Cisco 78", "Cisco 88"];

/// What the operator asked to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    DeskPhone,
    SoftClient,
    Both,
}

impl BuildType {
    pub const ALL: [BuildType; 3] = [BuildType::DeskPhone, BuildType::SoftClient, BuildType::Both];

    pub fn includes_soft_client(&self) -> bool {
        matches!(self, BuildType::SoftClient | BuildType::Both)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::DeskPhone => write!(f, "Desk Phone Only"),
            BuildType::SoftClient => write!(f, "Jabber Only"),
            BuildType::Both => write!(f, "Desk Phone & Jabber"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacError {
    #[error("MAC address must be 12 hex digits, optionally grouped in pairs by ':' or '-'")]
    Format,
}

/// A validated MAC address, stored as 12 uppercase hex digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddress(String);

impl MacAddress {
    /// The normalized form: no separators, uppercase
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Desk phone device name, e.g. `SEP001122334455`
    pub fn device_name(&self) -> String {
        format!("{}{}", DESK_PHONE_PREFIX, self.0)
    }
}

impl FromStr for MacAddress {
    type Err = MacError;

    /// Accepts `001122334455`, `00:11:22:33:44:55` or `00-11-22-33-44-55`.
    /// A grouped address must use the same separator throughout.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let separator = input.chars().nth(2).filter(|c| *c == ':' || *c == '-');

        let digits: String = match separator {
            Some(sep) => {
                let groups: Vec<&str> = input.split(sep).collect();
                if groups.len() != 6 || groups.iter().any(|g| g.len() != 2) {
                    return Err(MacError::Format);
                }
                groups.concat()
            }
            None => input.to_string(),
        };

        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MacError::Format);
        }

        Ok(MacAddress(digits.to_ascii_uppercase()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Device signalling protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Sip,
    Sccp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Sip => "SIP",
            Protocol::Sccp => "SCCP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desk phone model as typed by the operator, e.g. `7962` or `8845`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskPhoneModel(String);

impl DeskPhoneModel {
    /// Accepts the bare model number, with or without a leading "Cisco "
    pub fn new(input: &str) -> Option<Self> {
        let words: Vec<&str> = input.split_whitespace().collect();
        let words = match words.split_first() {
            Some((first, rest)) if first.eq_ignore_ascii_case("cisco") => rest,
            _ => &words[..],
        };
        if words.is_empty() {
            None
        } else {
            Some(DeskPhoneModel(words.join(" ")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Product and model name as AXL knows it, e.g. `Cisco 7962`
    pub fn product(&self) -> String {
        format!("Cisco {}", self.0)
    }

    pub fn protocol(&self) -> Protocol {
        let product = self.product();
        if SIP_SERIES.iter().any(|series| product.starts_with(series)) {
            Protocol::Sip
        } else {
            Protocol::Sccp
        }
    }

    /// Security profile for SIP models; SCCP models use none
    pub fn security_profile(&self) -> Option<String> {
        match self.protocol() {
            Protocol::Sip => Some(format!("{} - Standard SIP Non-Secure Profile", self.product())),
            Protocol::Sccp => None,
        }
    }

    /// Phone button template, e.g. `Standard 7962G SCCP`
    pub fn phone_template(&self) -> String {
        if LEGACY_G_MODELS.contains(&self.0.as_str()) {
            format!("Standard {}G {}", self.0, self.protocol())
        } else {
            format!("Standard {} {}", self.0, self.protocol())
        }
    }
}

/// Desk phone part of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskPhone {
    pub model: DeskPhoneModel,
    pub mac: MacAddress,
}

impl DeskPhone {
    pub fn device_name(&self) -> String {
        self.mac.device_name()
    }
}

/// The devices a build creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTarget {
    DeskPhone(DeskPhone),
    SoftClient,
    Both(DeskPhone),
}

impl BuildTarget {
    pub fn build_type(&self) -> BuildType {
        match self {
            BuildTarget::DeskPhone(_) => BuildType::DeskPhone,
            BuildTarget::SoftClient => BuildType::SoftClient,
            BuildTarget::Both(_) => BuildType::Both,
        }
    }

    pub fn desk_phone(&self) -> Option<&DeskPhone> {
        match self {
            BuildTarget::DeskPhone(desk) | BuildTarget::Both(desk) => Some(desk),
            BuildTarget::SoftClient => None,
        }
    }
}

/// Soft client device name, e.g. `csfjdoe`
pub fn soft_client_device_name(username: &str) -> String {
    format!("{}{}", SOFT_CLIENT_PREFIX, username)
}

/// Everything gathered from the operator before touching the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneBuildRequest {
    pub username: String,
    pub extension: String,
    pub target: BuildTarget,
    pub location: LocationBundle,
}

impl PhoneBuildRequest {
    pub fn desk_phone_name(&self) -> Option<String> {
        self.target.desk_phone().map(DeskPhone::device_name)
    }

    pub fn soft_client_name(&self) -> Option<String> {
        self.target
            .build_type()
            .includes_soft_client()
            .then(|| soft_client_device_name(&self.username))
    }

    /// Devices created by this build, desk phone first
    pub fn device_names(&self) -> Vec<String> {
        self.desk_phone_name()
            .into_iter()
            .chain(self.soft_client_name())
            .collect()
    }
}

/// A build request joined with the directory data of its user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub request: PhoneBuildRequest,
    /// Device and line description, e.g. `Jane Doe - 1234`
    pub description: String,
    /// Line display / alerting name, e.g. `Doe, J`
    pub display_name: String,
}

impl BuildPlan {
    pub fn new(request: PhoneBuildRequest, user: &UserRecord) -> Self {
        let description = format!("{} - {}", user.full_name(), request.extension);
        let display_name = user.display_name();
        Self {
            request,
            description,
            display_name,
        }
    }

    /// One-line summary shown before anything is created
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) in {}",
            self.description,
            self.request.target.build_type(),
            self.request.location.location_name
        )
    }
}
