//! Interactive workflows
//!
//! Each workflow receives a [`Context`] holding the settings, the prompter,
//! the credential store and a [`Connector`] that turns an endpoint plus
//! credentials into an [`AxlApi`]. Nothing is kept in globals; values chosen
//! during a run (credentials, location, API handle) are passed from step to
//! step.

pub mod ldap;
pub mod logout;
pub mod provision;
pub mod selection;

use crate::axl::{AxlApi, AxlClient, Endpoint, OperationCatalog};
use crate::config::{AxlSettings, Settings};
use crate::credentials::{CredentialProvider, CredentialStore, Credentials};
use crate::output::Prompter;
use crate::utils::progress::print_fail;
use crate::utils::{AxlError, WorkflowError};
use std::sync::Arc;

/// Builds an API handle for a cluster
pub trait Connector {
    type Api: AxlApi;

    fn connect(&self, endpoint: &Endpoint, credentials: &Credentials) -> Result<Self::Api, AxlError>;
}

/// Connects with the SOAP client
pub struct SoapConnector {
    catalog: Arc<OperationCatalog>,
    settings: AxlSettings,
    debug: bool,
}

impl SoapConnector {
    pub fn new(catalog: OperationCatalog, settings: AxlSettings, debug: bool) -> Self {
        Self {
            catalog: Arc::new(catalog),
            settings,
            debug,
        }
    }
}

impl Connector for SoapConnector {
    type Api = AxlClient;

    fn connect(&self, endpoint: &Endpoint, credentials: &Credentials) -> Result<AxlClient, AxlError> {
        AxlClient::connect(
            endpoint,
            credentials,
            Arc::clone(&self.catalog),
            &self.settings,
            self.debug,
        )
    }
}

/// Everything a workflow needs from its caller
pub struct Context<'a, C: Connector> {
    pub settings: &'a Settings,
    pub prompter: &'a dyn Prompter,
    pub store: &'a dyn CredentialStore,
    pub connector: &'a C,
}

impl<'a, C: Connector> Context<'a, C> {
    pub fn credentials(&self, reset: bool) -> Result<Credentials, WorkflowError> {
        CredentialProvider::new(self.store, self.prompter, &self.settings.credentials).resolve(reset)
    }
}

/// Log a failed AXL call against the operator and tag it with its step
pub(crate) fn step_failed(operator: &str, step: &'static str, err: AxlError) -> WorkflowError {
    tracing::error!(operator, step, fault = %err, "AXL call failed");
    print_fail(&format!("{} failed: {}", step, err));
    WorkflowError::Step { step, source: err }
}
