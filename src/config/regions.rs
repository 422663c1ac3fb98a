//! Regional CUCM clusters and the office locations served by each
//!
//! A region carries the cluster endpoint plus cluster-wide defaults; a
//! location carries the per-site device settings. Resolving a location
//! against its region yields an immutable [`LocationBundle`] used for the
//! rest of the run.

use crate::axl::{Endpoint, Verify};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A CUCM cluster and its locations
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub name: String,
    pub server_url: String,
    /// PEM chain used to verify the server; absent means no verification
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    pub route_partition: String,
    pub softkey_template: String,
    #[serde(default)]
    pub user_locale: Option<String>,
    #[serde(default)]
    pub common_device_config: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Per-site settings; optional fields override the region defaults
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub name: String,
    pub device_pool: String,
    pub location_name: String,
    pub calling_search_space: String,
    #[serde(default)]
    pub common_device_config: Option<String>,
    #[serde(default)]
    pub user_locale: Option<String>,
    #[serde(default)]
    pub softkey_template: Option<String>,
    #[serde(default)]
    pub call_forward_all_css: Option<String>,
    #[serde(default)]
    pub e164_mask: Option<String>,
    /// Shown to the operator when the location is picked
    #[serde(default)]
    pub notice: Option<String>,
}

/// Fully resolved settings for one location of one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationBundle {
    pub region: String,
    pub location: String,
    pub server_url: String,
    pub cert_path: Option<PathBuf>,
    pub route_partition: String,
    pub device_pool: String,
    pub location_name: String,
    pub calling_search_space: String,
    pub common_device_config: Option<String>,
    pub softkey_template: String,
    pub user_locale: Option<String>,
    pub call_forward_all_css: Option<String>,
    pub e164_mask: Option<String>,
}

/// A PEM chain to verify against, or no verification at all
fn verify(cert_path: Option<&Path>) -> Verify {
    match cert_path {
        Some(path) => Verify::Certificate(path.to_path_buf()),
        None => Verify::Disabled,
    }
}

impl Region {
    /// Connection details for this cluster
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            server_url: self.server_url.clone(),
            verify: verify(self.cert_path.as_deref()),
        }
    }

    /// Combine a location with this region's defaults
    pub fn bundle(&self, location: &Location) -> LocationBundle {
        LocationBundle {
            region: self.name.clone(),
            location: location.name.clone(),
            server_url: self.server_url.clone(),
            cert_path: self.cert_path.clone(),
            route_partition: self.route_partition.clone(),
            device_pool: location.device_pool.clone(),
            location_name: location.location_name.clone(),
            calling_search_space: location.calling_search_space.clone(),
            common_device_config: location
                .common_device_config
                .clone()
                .or_else(|| self.common_device_config.clone()),
            softkey_template: location
                .softkey_template
                .clone()
                .unwrap_or_else(|| self.softkey_template.clone()),
            user_locale: location
                .user_locale
                .clone()
                .or_else(|| self.user_locale.clone()),
            call_forward_all_css: location.call_forward_all_css.clone(),
            e164_mask: location.e164_mask.clone(),
        }
    }
}

impl LocationBundle {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            server_url: self.server_url.clone(),
            verify: verify(self.cert_path.as_deref()),
        }
    }
}

fn location(
    name: &str,
    device_pool: &str,
    location_name: &str,
    calling_search_space: &str,
    call_forward_all_css: &str,
) -> Location {
    Location {
        name: name.to_string(),
        device_pool: device_pool.to_string(),
        location_name: location_name.to_string(),
        calling_search_space: calling_search_space.to_string(),
        common_device_config: None,
        user_locale: None,
        softkey_template: None,
        call_forward_all_css: Some(call_forward_all_css.to_string()),
        e164_mask: None,
        notice: None,
    }
}

fn internal_only_notice(site: &str, css: &str) -> Option<String> {
    Some(format!(
        "{} set to allow internal forwarding only (Forward All CSS = {})",
        site, css
    ))
}

/// Built-in clusters used when no configuration file provides any
pub fn default_regions() -> Vec<Region> {
    vec![
        Region {
            name: "US".to_string(),
            server_url: "https://cucm-us.example.com:8443/axl/".to_string(),
            cert_path: Some(PathBuf::from("certs/us-cert-chain.pem")),
            route_partition: "ALL_IPPhones".to_string(),
            softkey_template: "Standard User".to_string(),
            user_locale: Some("English United States".to_string()),
            common_device_config: Some("US-PHONES".to_string()),
            locations: vec![
                location(
                    "Location 1",
                    "LOCATION1_PHONES",
                    "LOCATION1",
                    "LOCATION1_INTERNATIONAL",
                    "LOCATION1_CFA_CSS",
                ),
                location(
                    "Location 2",
                    "LOCATION2_PHONES",
                    "LOCATION2",
                    "LOCATION2_LONG_DISTANCE",
                    "LOCATION2_CFA_CSS",
                ),
            ],
        },
        Region {
            name: "Europe".to_string(),
            server_url: "https://cucm-eu.example.com:8443/axl/".to_string(),
            cert_path: Some(PathBuf::from("certs/europe-cert-chain.pem")),
            route_partition: "CLUSTER-DN".to_string(),
            softkey_template: "Standard User".to_string(),
            user_locale: None,
            common_device_config: None,
            locations: vec![
                Location {
                    common_device_config: Some("DENMARK-PHONES".to_string()),
                    user_locale: Some("Danish Denmark".to_string()),
                    notice: internal_only_notice("Denmark", "CW-INTERNAL"),
                    ..location(
                        "Denmark",
                        "DENMARK-PHONES",
                        "DENMARK",
                        "DEVICE-DENMARK-UNRESTRICTED",
                        "CW-INTERNAL",
                    )
                },
                Location {
                    common_device_config: Some("GERMANY-PHONES".to_string()),
                    user_locale: Some("German Germany".to_string()),
                    notice: internal_only_notice("Germany", "CW-INTERNAL"),
                    ..location(
                        "Germany",
                        "GERMANY-PHONES",
                        "GERMANY",
                        "DEVICE-GERMANY-UNRESTRICTED",
                        "CW-INTERNAL",
                    )
                },
            ],
        },
        Region {
            name: "APAC".to_string(),
            server_url: "https://cucm-apac.example.com:8443/axl/".to_string(),
            cert_path: Some(PathBuf::from("certs/apac-cert-chain.pem")),
            route_partition: "SYSTEM-CLUSTER-DN".to_string(),
            softkey_template: "CUSTOM User".to_string(),
            user_locale: None,
            common_device_config: None,
            locations: vec![
                Location {
                    common_device_config: Some("AUSTRALIA-PHONES".to_string()),
                    user_locale: Some("English United States".to_string()),
                    softkey_template: Some("CUSTOM AUSTRALIA User".to_string()),
                    notice: internal_only_notice("Australia", "SYSTEM-CW-INTERNAL"),
                    ..location(
                        "Australia",
                        "AUSTRALIA-PHONES",
                        "AUSTRALIA",
                        "AUSTRALIA-UNRESTRICTED",
                        "SYSTEM-CW-INTERNAL",
                    )
                },
                Location {
                    common_device_config: Some("JAPAN-PHONES".to_string()),
                    user_locale: Some("Japanese Japan".to_string()),
                    notice: internal_only_notice("Japan", "SYSTEM-CW-INTERNAL"),
                    ..location(
                        "Japan",
                        "JAPAN-PHONES",
                        "JAPAN",
                        "JAPAN-UNRESTRICTED",
                        "SYSTEM-CW-INTERNAL",
                    )
                },
            ],
        },
    ]
}
