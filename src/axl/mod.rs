//! CUCM AXL SOAP access
//!
//! - [`catalog`]: SOAPAction lookup from the AXL WSDL
//! - [`client`]: the HTTP/SOAP client
//! - [`api`]: the operations the workflows depend on
//! - [`payload`]: request bodies for the write operations
//! - [`fault`]: classification of SOAP faults

pub mod api;
pub mod catalog;
pub mod client;
pub mod fault;
pub mod payload;
pub mod xml;

pub use api::AxlApi;
pub use catalog::OperationCatalog;
pub use client::{AxlClient, Endpoint, Verify};
pub use fault::FaultKind;
pub use payload::{LineAppearance, LineUpdate, PhonePayload, UserUpdate};
pub use xml::XmlNode;
