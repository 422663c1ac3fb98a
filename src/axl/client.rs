//! SOAP client for the CUCM AXL service
//!
//! Each call wraps a request element in a SOAP 1.1 envelope, posts it with
//! HTTP basic authentication and the SOAPAction header from the WSDL
//! catalog, and hands back the `return` element of the response. SOAP
//! faults are turned into [`AxlError::Fault`].

use super::api::AxlApi;
use super::catalog::OperationCatalog;
use super::payload::{LineUpdate, PhonePayload, UserUpdate};
use super::xml::{parse_document, XmlNode};
use crate::config::AxlSettings;
use crate::credentials::Credentials;
use crate::models::{LineInfo, Phone, ProfileRef, UserRecord};
use crate::utils::AxlError;
use async_trait::async_trait;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// How the server certificate is checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verify {
    /// Trust the PEM chain at this path
    Certificate(PathBuf),
    /// Accept any certificate
    Disabled,
}

/// Where a CUCM cluster's AXL service lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub server_url: String,
    pub verify: Verify,
}

/// AXL client bound to one cluster and one set of credentials
pub struct AxlClient {
    http: reqwest::Client,
    url: String,
    namespace: String,
    catalog: Arc<OperationCatalog>,
    credentials: Credentials,
    debug: bool,
}

impl AxlClient {
    pub fn connect(
        endpoint: &Endpoint,
        credentials: &Credentials,
        catalog: Arc<OperationCatalog>,
        settings: &AxlSettings,
        debug: bool,
    ) -> Result<Self, AxlError> {
        let mut builder = reqwest::Client::builder().timeout(settings.timeout());

        builder = match &endpoint.verify {
            Verify::Certificate(path) => {
                let pem = std::fs::read(path).map_err(|e| AxlError::Certificate {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
                    AxlError::Certificate {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                })?;
                certs
                    .into_iter()
                    .fold(builder, |b, cert| b.add_root_certificate(cert))
            }
            Verify::Disabled => {
                tracing::warn!(
                    "Certificate verification disabled for {}",
                    endpoint.server_url
                );
                builder.danger_accept_invalid_certs(true)
            }
        };

        Ok(Self {
            http: builder.build()?,
            url: endpoint.server_url.clone(),
            namespace: settings.namespace(),
            catalog,
            credentials: credentials.clone(),
            debug,
        })
    }

    fn envelope(&self, request: XmlNode) -> XmlNode {
        XmlNode::new("soapenv:Envelope")
            .attr("xmlns:soapenv", SOAP_ENV_NS)
            .attr("xmlns:ns", self.namespace.as_str())
            .child(XmlNode::new("soapenv:Header"))
            .child(XmlNode::new("soapenv:Body").child(request))
    }

    fn dump(&self, label: &str, xml: &str) {
        if !self.debug {
            return;
        }
        let pretty = parse_document(xml)
            .and_then(|doc| doc.to_pretty())
            .unwrap_or_else(|_| xml.to_string());
        println!("{}", style(label).cyan().bold());
        println!("{}", pretty);
    }

    /// Send one request element (named `ns:<operation>`) and return the
    /// `return` element of the response
    pub async fn call(&self, request: XmlNode) -> Result<XmlNode, AxlError> {
        let operation = request.local_name().to_string();
        let action = self.catalog.soap_action(&operation)?;
        let envelope = self.envelope(request).to_document()?;
        self.dump(&format!("--- {} request ---", operation), &envelope);

        let response = self
            .http
            .post(&self.url)
            .basic_auth(self.credentials.username(), Some(self.credentials.password()))
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", action))
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        self.dump(&format!("--- {} response ({}) ---", operation, status), &body);

        match parse_document(&body) {
            Ok(document) => {
                if let Some(fault) = document.find("Fault") {
                    return Err(fault_from(fault));
                }
                if !status.is_success() {
                    return Err(AxlError::Http {
                        status: status.as_u16(),
                        body,
                    });
                }
                extract_return(&document, &operation)
            }
            Err(_) if !status.is_success() => Err(AxlError::Http {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(AxlError::MalformedResponse {
                message: format!("{} response is not XML: {}", operation, e),
            }),
        }
    }

    fn request(operation: &str) -> XmlNode {
        XmlNode::new(format!("ns:{}", operation))
    }
}

fn fault_from(fault: &XmlNode) -> AxlError {
    let message = fault
        .child_text("faultstring")
        .unwrap_or("SOAP fault without faultstring")
        .to_string();
    let code = fault
        .path(&["detail", "axlError", "axlcode"])
        .and_then(XmlNode::text)
        .and_then(|code| code.parse().ok());
    AxlError::Fault { message, code }
}

fn extract_return(document: &XmlNode, operation: &str) -> Result<XmlNode, AxlError> {
    let response = document
        .get("Body")
        .and_then(|body| body.children.first())
        .ok_or_else(|| AxlError::MalformedResponse {
            message: format!("{} response has an empty body", operation),
        })?;
    // void operations may omit the return element entirely
    Ok(response
        .get("return")
        .cloned()
        .unwrap_or_else(|| XmlNode::new("return")))
}

fn device_list(node: Option<&XmlNode>) -> Vec<String> {
    node.map(|list| {
        list.get_all("device")
            .filter_map(XmlNode::text)
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn owned(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

pub(crate) fn parse_phones(ret: &XmlNode) -> Vec<Phone> {
    ret.get_all("phone")
        .filter_map(|phone| {
            let name = phone.child_text("name")?.to_string();
            let current_profile = phone.get("currentProfileName").map(|profile| ProfileRef {
                name: owned(profile.text()),
                uuid: owned(profile.attribute("uuid")),
            });
            Some(Phone {
                name,
                current_profile,
                description: owned(phone.child_text("description")),
            })
        })
        .collect()
}

pub(crate) fn parse_line(ret: &XmlNode) -> Result<LineInfo, AxlError> {
    let line = ret.get("line").ok_or_else(|| AxlError::MalformedResponse {
        message: "getLine response has no line element".to_string(),
    })?;
    Ok(LineInfo {
        pattern: line.child_text("pattern").unwrap_or_default().to_string(),
        route_partition: owned(line.child_text("routePartitionName")),
        description: owned(line.child_text("description")),
        associated_devices: device_list(line.get("associatedDevices")),
    })
}

pub(crate) fn parse_user(ret: &XmlNode) -> Result<UserRecord, AxlError> {
    let user = ret.get("user").ok_or_else(|| AxlError::MalformedResponse {
        message: "getUser response has no user element".to_string(),
    })?;
    Ok(UserRecord {
        userid: user.child_text("userid").unwrap_or_default().to_string(),
        first_name: owned(user.child_text("firstName")),
        last_name: owned(user.child_text("lastName")),
        associated_devices: device_list(user.get("associatedDevices")),
    })
}

#[async_trait]
impl AxlApi for AxlClient {
    async fn list_phones(&self, name_pattern: &str) -> Result<Vec<Phone>, AxlError> {
        let request = Self::request("listPhone")
            .child(XmlNode::new("searchCriteria").leaf_child("name", name_pattern))
            .child(
                XmlNode::new("returnedTags")
                    .child(XmlNode::new("name"))
                    .child(XmlNode::new("description"))
                    .child(XmlNode::new("currentProfileName")),
            );
        let ret = self.call(request).await?;
        Ok(parse_phones(&ret))
    }

    async fn do_device_logout(&self, device: &str) -> Result<(), AxlError> {
        self.call(Self::request("doDeviceLogout").leaf_child("deviceName", device))
            .await?;
        Ok(())
    }

    async fn get_line(&self, pattern: &str, route_partition: &str) -> Result<LineInfo, AxlError> {
        let request = Self::request("getLine")
            .leaf_child("pattern", pattern)
            .leaf_child("routePartitionName", route_partition);
        let ret = self.call(request).await?;
        parse_line(&ret)
    }

    async fn remove_phone(&self, name: &str) -> Result<(), AxlError> {
        self.call(Self::request("removePhone").leaf_child("name", name))
            .await?;
        Ok(())
    }

    async fn do_ldap_sync(&self, directory: &str) -> Result<(), AxlError> {
        let request = Self::request("doLdapSync")
            .leaf_child("name", directory)
            .leaf_child("sync", "true");
        self.call(request).await?;
        Ok(())
    }

    async fn get_ldap_sync_status(&self, directory: &str) -> Result<String, AxlError> {
        let ret = self
            .call(Self::request("getLdapSyncStatus").leaf_child("name", directory))
            .await?;
        Ok(ret.text().unwrap_or_default().to_string())
    }

    async fn get_user(&self, userid: &str) -> Result<UserRecord, AxlError> {
        let ret = self
            .call(Self::request("getUser").leaf_child("userid", userid))
            .await?;
        parse_user(&ret)
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<(), AxlError> {
        self.call(update.to_xml()).await?;
        Ok(())
    }

    async fn add_phone(&self, phone: &PhonePayload) -> Result<(), AxlError> {
        self.call(Self::request("addPhone").child(phone.to_xml()))
            .await?;
        Ok(())
    }

    async fn update_line(&self, update: &LineUpdate) -> Result<(), AxlError> {
        self.call(update.to_xml()).await?;
        Ok(())
    }

    async fn update_phone_owner(&self, device: &str, owner: &str) -> Result<(), AxlError> {
        let request = Self::request("updatePhone")
            .leaf_child("name", device)
            .leaf_child("ownerUserName", owner);
        self.call(request).await?;
        Ok(())
    }
}
