//! Request payloads for the write operations
//!
//! `addPhone`, `updateLine` and `updateUser` take large nested structures;
//! they are modelled here as plain structs so workflows can build and
//! inspect them before anything is sent.

use super::xml::XmlNode;
use crate::models::{BuildPlan, DeskPhone, Protocol};

pub const SOFT_CLIENT_PRODUCT: &str = "Cisco Unified Client Services Framework";
pub const SOFT_CLIENT_TEMPLATE: &str = "Standard Client Services Framework";
pub const SOFT_CLIENT_SECURITY_PROFILE: &str =
    "Cisco Unified Client Services Framework - Standard SIP Non-Secure Profile";
pub const COMMON_PHONE_CONFIG: &str = "Standard Common Phone Profile";

/// The single line appearance added with a new device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAppearance {
    pub label: String,
    pub pattern: String,
    pub route_partition: String,
    pub display: String,
    pub e164_mask: Option<String>,
    pub end_user: String,
}

impl LineAppearance {
    fn to_xml(&self) -> XmlNode {
        let line = XmlNode::new("line")
            .leaf_child("index", "1")
            .leaf_child("label", &self.label)
            .leaf_child("display", &self.display)
            .child(
                XmlNode::new("dirn")
                    .leaf_child("pattern", &self.pattern)
                    .leaf_child("routePartitionName", &self.route_partition),
            )
            .leaf_child("displayAscii", &self.display)
            .optional_child("e164Mask", self.e164_mask.as_deref())
            .child(
                XmlNode::new("associatedEndusers")
                    .child(XmlNode::new("enduser").leaf_child("userId", &self.end_user)),
            );
        XmlNode::new("lines").child(line)
    }
}

/// Body of an `addPhone` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonePayload {
    pub name: String,
    pub description: String,
    pub product: String,
    pub protocol: Protocol,
    pub device_pool: String,
    pub common_device_config: Option<String>,
    pub phone_template: String,
    pub softkey_template: Option<String>,
    pub location: String,
    pub calling_search_space: String,
    pub security_profile: Option<String>,
    pub line: LineAppearance,
}

impl PhonePayload {
    fn from_plan(plan: &BuildPlan, name: String, product: String, protocol: Protocol) -> Self {
        let bundle = &plan.request.location;
        Self {
            name,
            description: plan.description.clone(),
            product,
            protocol,
            device_pool: bundle.device_pool.clone(),
            common_device_config: bundle.common_device_config.clone(),
            phone_template: String::new(),
            softkey_template: None,
            location: bundle.location_name.clone(),
            calling_search_space: bundle.calling_search_space.clone(),
            security_profile: None,
            line: LineAppearance {
                label: plan.description.clone(),
                pattern: plan.request.extension.clone(),
                route_partition: bundle.route_partition.clone(),
                display: plan.display_name.clone(),
                e164_mask: bundle.e164_mask.clone(),
                end_user: plan.request.username.clone(),
            },
        }
    }

    /// Desk phone; protocol, security profile and template follow the model
    pub fn desk_phone(plan: &BuildPlan, desk: &DeskPhone) -> Self {
        Self {
            phone_template: desk.model.phone_template(),
            softkey_template: Some(plan.request.location.softkey_template.clone()),
            security_profile: desk.model.security_profile(),
            ..Self::from_plan(
                plan,
                desk.device_name(),
                desk.model.product(),
                desk.model.protocol(),
            )
        }
    }

    /// Jabber soft client for the plan's user
    pub fn soft_client(plan: &BuildPlan) -> Self {
        Self {
            phone_template: SOFT_CLIENT_TEMPLATE.to_string(),
            security_profile: Some(SOFT_CLIENT_SECURITY_PROFILE.to_string()),
            ..Self::from_plan(
                plan,
                crate::models::soft_client_device_name(&plan.request.username),
                SOFT_CLIENT_PRODUCT.to_string(),
                Protocol::Sip,
            )
        }
    }

    /// Children follow the `XPhone` sequence in AXLSoap.xsd
    pub fn to_xml(&self) -> XmlNode {
        XmlNode::new("phone")
            .leaf_child("name", &self.name)
            .leaf_child("description", &self.description)
            .leaf_child("product", &self.product)
            .leaf_child("model", &self.product)
            .leaf_child("class", "Phone")
            .leaf_child("protocol", self.protocol.as_str())
            .leaf_child("protocolSide", "User")
            .leaf_child("callingSearchSpaceName", &self.calling_search_space)
            .leaf_child("devicePoolName", &self.device_pool)
            .optional_child("commonDeviceConfigName", self.common_device_config.as_deref())
            .leaf_child("commonPhoneConfigName", COMMON_PHONE_CONFIG)
            .leaf_child("locationName", &self.location)
            .leaf_child("useTrustedRelayPoint", "Default")
            .leaf_child("retryVideoCallAsAudio", "true")
            .optional_child("securityProfileName", self.security_profile.as_deref())
            .child(self.line.to_xml())
            .leaf_child("phoneTemplateName", &self.phone_template)
            .optional_child("softkeyTemplateName", self.softkey_template.as_deref())
            .leaf_child("enableExtensionMobility", "true")
            .leaf_child("builtInBridgeStatus", "Default")
            .leaf_child("hlogStatus", "On")
            .leaf_child("packetCaptureMode", "None")
            .leaf_child("allowCtiControlFlag", "true")
            .leaf_child("certificateOperation", "No Pending Operation")
            .leaf_child("deviceMobilityMode", "Default")
    }
}

/// Body of an `updateLine` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineUpdate {
    pub pattern: String,
    pub route_partition: String,
    pub alerting_name: String,
    pub description: String,
    pub call_forward_all_css: Option<String>,
}

impl LineUpdate {
    pub fn from_plan(plan: &BuildPlan) -> Self {
        let bundle = &plan.request.location;
        Self {
            pattern: plan.request.extension.clone(),
            route_partition: bundle.route_partition.clone(),
            alerting_name: plan.display_name.clone(),
            description: plan.description.clone(),
            call_forward_all_css: bundle.call_forward_all_css.clone(),
        }
    }

    pub fn to_xml(&self) -> XmlNode {
        let mut node = XmlNode::new("ns:updateLine")
            .leaf_child("pattern", &self.pattern)
            .leaf_child("routePartitionName", &self.route_partition)
            .leaf_child("description", &self.description);
        if let Some(css) = &self.call_forward_all_css {
            node.push(XmlNode::new("callForwardAll").leaf_child("callingSearchSpaceName", css));
        }
        node.leaf_child("alertingName", &self.alerting_name)
            .leaf_child("asciiAlertingName", &self.alerting_name)
    }
}

/// Body of an `updateUser` request; only the fields that are set are sent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserUpdate {
    pub userid: String,
    pub user_locale: Option<String>,
    pub home_cluster: Option<bool>,
    pub im_and_presence: Option<bool>,
    pub enable_cti: Option<bool>,
    pub associated_devices: Option<Vec<String>>,
    pub associated_groups: Option<Vec<String>>,
    /// (pattern, route partition)
    pub primary_extension: Option<(String, String)>,
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl UserUpdate {
    /// Children follow the `UpdateUserReq` sequence in AXLSoap.xsd
    pub fn to_xml(&self) -> XmlNode {
        let mut node = XmlNode::new("ns:updateUser")
            .leaf_child("userid", &self.userid)
            .optional_child("userLocale", self.user_locale.as_deref());

        if let Some(devices) = &self.associated_devices {
            let mut list = XmlNode::new("associatedDevices");
            for device in devices {
                list.push(XmlNode::leaf("device", device));
            }
            node.push(list);
        }
        if let Some((pattern, partition)) = &self.primary_extension {
            node.push(
                XmlNode::new("primaryExtension")
                    .leaf_child("pattern", pattern)
                    .leaf_child("routePartitionName", partition),
            );
        }
        if let Some(groups) = &self.associated_groups {
            let mut list = XmlNode::new("associatedGroups");
            for group in groups {
                list.push(XmlNode::new("userGroup").leaf_child("name", group));
            }
            node.push(list);
        }
        node.optional_child("enableCti", self.enable_cti.map(flag))
            .optional_child("homeCluster", self.home_cluster.map(flag))
            .optional_child("imAndPresenceEnable", self.im_and_presence.map(flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::regions::default_regions;
    use crate::models::{BuildTarget, DeskPhoneModel, PhoneBuildRequest, UserRecord};

    fn plan(target: BuildTarget) -> BuildPlan {
        let regions = default_regions();
        let location = regions[0].bundle(&regions[0].locations[0]);
        let request = PhoneBuildRequest {
            username: "jdoe".to_string(),
            extension: "1234".to_string(),
            target,
            location,
        };
        let user = UserRecord {
            userid: "jdoe".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            associated_devices: vec![],
        };
        BuildPlan::new(request, &user)
    }

    fn desk(model: &str) -> DeskPhone {
        DeskPhone {
            model: DeskPhoneModel::new(model).unwrap(),
            mac: "001122334455".parse().unwrap(),
        }
    }

    #[test]
    fn test_sccp_desk_phone_payload() {
        let desk = desk("7962");
        let plan = plan(BuildTarget::DeskPhone(desk.clone()));
        let payload = PhonePayload::desk_phone(&plan, &desk);

        assert_eq!(payload.name, "SEP001122334455");
        assert_eq!(payload.protocol, Protocol::Sccp);
        assert_eq!(payload.phone_template, "Standard 7962G SCCP");
        assert_eq!(payload.security_profile, None);
        assert_eq!(payload.softkey_template.as_deref(), Some("Standard User"));
        assert_eq!(payload.line.display, "Doe, J");
        assert_eq!(payload.description, "Jane Doe - 1234");

        let xml = payload.to_xml();
        assert!(xml.get("securityProfileName").is_none());
        assert_eq!(xml.child_text("protocol"), Some("SCCP"));
        assert_eq!(
            xml.path(&["lines", "line", "dirn"]).unwrap().child_text("routePartitionName"),
            Some("ALL_IPPhones")
        );
    }

    #[test]
    fn test_sip_desk_phone_payload_has_security_profile() {
        let desk = desk("8845");
        let plan = plan(BuildTarget::DeskPhone(desk.clone()));
        let xml = PhonePayload::desk_phone(&plan, &desk).to_xml();
        assert_eq!(
            xml.child_text("securityProfileName"),
            Some("Cisco 8845 - Standard SIP Non-Secure Profile")
        );
        assert_eq!(xml.child_text("phoneTemplateName"), Some("Standard 8845 SIP"));
    }

    #[test]
    fn test_soft_client_payload() {
        let plan = plan(BuildTarget::SoftClient);
        let payload = PhonePayload::soft_client(&plan);
        assert_eq!(payload.name, "csfjdoe");
        assert_eq!(payload.product, SOFT_CLIENT_PRODUCT);
        assert_eq!(payload.protocol, Protocol::Sip);
        assert!(payload.softkey_template.is_none());
        assert_eq!(
            payload.line.end_user, "jdoe",
            "line must be associated with the end user"
        );
    }

    #[test]
    fn test_line_update_includes_forward_all_css() {
        let plan = plan(BuildTarget::SoftClient);
        let xml = LineUpdate::from_plan(&plan).to_xml();
        assert_eq!(
            xml.path(&["callForwardAll"]).unwrap().child_text("callingSearchSpaceName"),
            Some("LOCATION1_CFA_CSS")
        );
        assert_eq!(xml.child_text("asciiAlertingName"), Some("Doe, J"));
    }

    #[test]
    fn test_user_update_sends_only_set_fields() {
        let update = UserUpdate {
            userid: "jdoe".to_string(),
            primary_extension: Some(("1234".to_string(), "ALL_IPPhones".to_string())),
            ..UserUpdate::default()
        };
        let xml = update.to_xml();
        assert_eq!(xml.children.len(), 2);
        assert!(xml.get("associatedDevices").is_none());
        assert_eq!(
            xml.path(&["primaryExtension"]).unwrap().child_text("pattern"),
            Some("1234")
        );
    }

    fn child_names(node: &XmlNode) -> Vec<&str> {
        node.children.iter().map(|c| c.local_name()).collect()
    }

    #[test]
    fn test_phone_children_follow_schema_order() {
        let desk = desk("8845");
        let plan = plan(BuildTarget::DeskPhone(desk.clone()));
        let xml = PhonePayload::desk_phone(&plan, &desk).to_xml();
        assert_eq!(
            child_names(&xml),
            [
                "name",
                "description",
                "product",
                "model",
                "class",
                "protocol",
                "protocolSide",
                "callingSearchSpaceName",
                "devicePoolName",
                "commonDeviceConfigName",
                "commonPhoneConfigName",
                "locationName",
                "useTrustedRelayPoint",
                "retryVideoCallAsAudio",
                "securityProfileName",
                "lines",
                "phoneTemplateName",
                "softkeyTemplateName",
                "enableExtensionMobility",
                "builtInBridgeStatus",
                "hlogStatus",
                "packetCaptureMode",
                "allowCtiControlFlag",
                "certificateOperation",
                "deviceMobilityMode",
            ]
        );
        assert_eq!(
            child_names(xml.path(&["lines", "line"]).unwrap()),
            [
                "index",
                "label",
                "display",
                "dirn",
                "displayAscii",
                "associatedEndusers"
            ]
        );
    }

    #[test]
    fn test_line_update_children_follow_schema_order() {
        let plan = plan(BuildTarget::SoftClient);
        let xml = LineUpdate::from_plan(&plan).to_xml();
        assert_eq!(
            child_names(&xml),
            [
                "pattern",
                "routePartitionName",
                "description",
                "callForwardAll",
                "alertingName",
                "asciiAlertingName",
            ]
        );
    }

    #[test]
    fn test_user_update_children_follow_schema_order() {
        let update = UserUpdate {
            userid: "jdoe".to_string(),
            user_locale: Some("English United States".to_string()),
            home_cluster: Some(true),
            im_and_presence: Some(true),
            enable_cti: Some(true),
            associated_devices: Some(vec!["csfjdoe".to_string()]),
            associated_groups: Some(vec!["Standard CCM End Users".to_string()]),
            primary_extension: Some(("1234".to_string(), "ALL_IPPhones".to_string())),
        };
        assert_eq!(
            child_names(&update.to_xml()),
            [
                "userid",
                "userLocale",
                "associatedDevices",
                "primaryExtension",
                "associatedGroups",
                "enableCti",
                "homeCluster",
                "imAndPresenceEnable",
            ]
        );
    }
}
