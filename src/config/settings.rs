//! Application settings configuration
//!
//! Defines the AXL endpoint catalog, LDAP sync polling, credential store
//! keys, logging, provisioning defaults and the regional clusters.

use super::regions::{default_regions, Region};
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// AXL transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxlSettings {
    pub wsdl_path: PathBuf,
    pub version: String,
    pub timeout_secs: u64,
}

impl Default for AxlSettings {
    fn default() -> Self {
        Self {
            wsdl_path: PathBuf::from("schema/AXLAPI.wsdl"),
            version: "11.5".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AxlSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// XML namespace of the AXL request elements
    pub fn namespace(&self) -> String {
        format!("http://www.cisco.com/AXL/API/{}", self.version)
    }
}

/// LDAP directory sync polling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LdapSettings {
    pub directory_name: String,
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
    pub success_status: String,
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            directory_name: "LDAP".to_string(),
            poll_interval_ms: 1000,
            max_attempts: 180,
            success_status: "Sync is performed successfully".to_string(),
        }
    }
}

impl LdapSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Service/account pairs under which credentials are kept
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    pub username_service: String,
    pub username_account: String,
    pub password_service: String,
    pub password_account: String,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            username_service: "username".to_string(),
            username_account: "username".to_string(),
            password_service: "cucmpassword".to_string(),
            password_account: "cucmpassword".to_string(),
        }
    }
}

/// Audit log location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("axl-toolkit.log"),
        }
    }
}

/// Provisioning defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvisioningSettings {
    pub user_groups: Vec<String>,
    pub max_mac_attempts: u32,
    pub followup_tasks: Vec<String>,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            user_groups: vec![
                "Standard CCM End Users".to_string(),
                "Standard CTI Enabled".to_string(),
            ],
            max_mac_attempts: 5,
            followup_tasks: vec![
                "Set up voicemail (import from LDAP using the Unity Connection GUI)".to_string(),
            ],
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub axl: AxlSettings,
    #[serde(default)]
    pub ldap: LdapSettings,
    #[serde(default)]
    pub credentials: CredentialSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub provisioning: ProvisioningSettings,
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            axl: AxlSettings::default(),
            ldap: LdapSettings::default(),
            credentials: CredentialSettings::default(),
            logging: LoggingSettings::default(),
            provisioning: ProvisioningSettings::default(),
            regions: default_regions(),
        }
    }
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the workflows cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "regions".to_string(),
                message: "at least one region is required".to_string(),
            });
        }
        if let Some(region) = self.regions.iter().find(|r| r.locations.is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: format!("regions.{}.locations", region.name),
                message: "at least one location is required".to_string(),
            });
        }
        if self.ldap.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ldap.max_attempts".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.provisioning.max_mac_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "provisioning.max_mac_attempts".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.axl.timeout(), Duration::from_secs(10));
        assert_eq!(settings.ldap.poll_interval(), Duration::from_secs(1));
        assert_eq!(settings.regions.len(), 3);
        assert_eq!(settings.credentials.password_service, "cucmpassword");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [ldap]
            max_attempts = 10
            "#,
        )
        .unwrap();
        assert_eq!(settings.ldap.max_attempts, 10);
        assert_eq!(settings.ldap.directory_name, "LDAP");
    }

    #[test]
    fn test_custom_regions_replace_defaults() {
        let settings = Settings::from_toml(
            r#"
            [[regions]]
            name = "Lab"
            server_url = "https://lab-cucm:8443/axl/"
            route_partition = "LAB-DN"
            softkey_template = "Standard User"

            [[regions.locations]]
            name = "Bench"
            device_pool = "LAB-PHONES"
            location_name = "LAB"
            calling_search_space = "LAB-CSS"
            "#,
        )
        .unwrap();
        assert_eq!(settings.regions.len(), 1);
        assert_eq!(settings.regions[0].locations[0].device_pool, "LAB-PHONES");
        assert!(settings.regions[0].cert_path.is_none());
    }

    #[test]
    fn test_region_without_locations_is_rejected() {
        let err = Settings::from_toml(
            r#"
            [[regions]]
            name = "Lab"
            server_url = "https://lab-cucm:8443/axl/"
            route_partition = "LAB-DN"
            softkey_template = "Standard User"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_namespace_follows_version() {
        let axl = AxlSettings {
            version: "14.0".to_string(),
            ..AxlSettings::default()
        };
        assert_eq!(axl.namespace(), "http://www.cisco.com/AXL/API/14.0");
    }
}
