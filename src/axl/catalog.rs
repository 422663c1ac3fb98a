//! WSDL operation catalog
//!
//! The AXL schema files are supplied by the CUCM administrator (they ship
//! with the AXL SQL toolkit). Only the binding section is read: it names
//! every operation the server accepts and the SOAPAction header for each.

use super::xml::parse_document;
use crate::utils::AxlError;
use std::collections::HashMap;
use std::path::Path;

/// Operation name → SOAPAction
#[derive(Debug, Clone, Default)]
pub struct OperationCatalog {
    actions: HashMap<String, String>,
}

impl OperationCatalog {
    /// Load the binding operations from a WSDL file
    pub fn load(path: &Path) -> Result<Self, AxlError> {
        let content = std::fs::read_to_string(path).map_err(|e| AxlError::Wsdl {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_wsdl(&content).map_err(|e| AxlError::Wsdl {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse WSDL text
    pub fn from_wsdl(content: &str) -> Result<Self, AxlError> {
        let definitions = parse_document(content)?;
        let mut actions = HashMap::new();

        for binding in definitions.get_all("binding") {
            for operation in binding.get_all("operation") {
                let Some(name) = operation.attribute("name") else {
                    continue;
                };
                let action = operation
                    .get("operation")
                    .and_then(|soap_op| soap_op.attribute("soapAction"))
                    .unwrap_or(name);
                actions.insert(name.to_string(), action.to_string());
            }
        }

        if actions.is_empty() {
            return Err(AxlError::MalformedResponse {
                message: "no binding operations found".to_string(),
            });
        }

        Ok(Self { actions })
    }

    /// SOAPAction for an operation, failing for anything the WSDL does not define
    pub fn soap_action(&self, operation: &str) -> Result<&str, AxlError> {
        self.actions
            .get(operation)
            .map(String::as_str)
            .ok_or_else(|| AxlError::UnknownOperation {
                operation: operation.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:s0="http://www.cisco.com/AXLAPIService/"
             targetNamespace="http://www.cisco.com/AXLAPIService/">
  <portType name="AXLPort">
    <operation name="getLine"/>
  </portType>
  <binding name="AXLAPIBinding" type="s0:AXLPort">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="getLine">
      <soap:operation soapAction="CUCM:DB ver=11.5 getLine" style="document"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
    <operation name="listPhone">
      <soap:operation soapAction="CUCM:DB ver=11.5 listPhone" style="document"/>
    </operation>
  </binding>
</definitions>"#;

    #[test]
    fn test_reads_binding_soap_actions() {
        let catalog = OperationCatalog::from_wsdl(WSDL).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.soap_action("getLine").unwrap(),
            "CUCM:DB ver=11.5 getLine"
        );
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let catalog = OperationCatalog::from_wsdl(WSDL).unwrap();
        assert!(matches!(
            catalog.soap_action("addPhone"),
            Err(AxlError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = OperationCatalog::load(Path::new("does/not/exist.wsdl")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.wsdl"));
    }
}
