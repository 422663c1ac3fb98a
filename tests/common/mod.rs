//! Shared test doubles: an in-memory AXL server, a scripted prompter and a
//! connector that hands out the fake.

#![allow(dead_code)]

use async_trait::async_trait;
use axl_toolkit::axl::{AxlApi, Endpoint, LineUpdate, PhonePayload, UserUpdate};
use axl_toolkit::credentials::{Credentials, MemoryStore};
use axl_toolkit::models::{LineInfo, Phone, ProfileRef, UserRecord};
use axl_toolkit::output::Prompter;
use axl_toolkit::utils::{AxlError, PromptError};
use axl_toolkit::workflow::Connector;
use axl_toolkit::Settings;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const SYNC_DONE: &str = "Sync is performed successfully";
pub const SYNC_RUNNING: &str = "Sync is currently under process";

/// Every call the fake received, with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListPhones(String),
    Logout(String),
    GetLine(String, String),
    RemovePhone(String),
    LdapSync(String),
    LdapStatus(String),
    GetUser(String),
    UpdateUser(UserUpdate),
    AddPhone(PhonePayload),
    UpdateLine(LineUpdate),
    UpdateOwner(String, String),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub phones: Vec<Phone>,
    pub line: LineInfo,
    pub user: UserRecord,
    pub ldap_statuses: VecDeque<String>,
    /// Device name -> fault text returned by `doDeviceLogout`
    pub logout_faults: HashMap<String, String>,
    /// Operation name -> fault texts returned by successive calls
    pub faults: HashMap<&'static str, VecDeque<String>>,
    pub calls: Vec<Call>,
}

/// In-memory AXL server
#[derive(Debug, Clone, Default)]
pub struct FakeAxl {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeAxl {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_next(&self, operation: &'static str, fault: &str) {
        self.state
            .lock()
            .unwrap()
            .faults
            .entry(operation)
            .or_default()
            .push_back(fault.to_string());
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), AxlError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.faults.get_mut(operation).and_then(VecDeque::pop_front) {
            Some(fault) => Err(AxlError::fault(fault)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AxlApi for FakeAxl {
    async fn list_phones(&self, name_pattern: &str) -> Result<Vec<Phone>, AxlError> {
        self.record("listPhone", Call::ListPhones(name_pattern.to_string()))?;
        Ok(self.state.lock().unwrap().phones.clone())
    }

    async fn do_device_logout(&self, device: &str) -> Result<(), AxlError> {
        self.record("doDeviceLogout", Call::Logout(device.to_string()))?;
        match self.state.lock().unwrap().logout_faults.get(device) {
            Some(fault) => Err(AxlError::fault(fault.clone())),
            None => Ok(()),
        }
    }

    async fn get_line(&self, pattern: &str, route_partition: &str) -> Result<LineInfo, AxlError> {
        self.record(
            "getLine",
            Call::GetLine(pattern.to_string(), route_partition.to_string()),
        )?;
        Ok(self.state.lock().unwrap().line.clone())
    }

    async fn remove_phone(&self, name: &str) -> Result<(), AxlError> {
        self.record("removePhone", Call::RemovePhone(name.to_string()))
    }

    async fn do_ldap_sync(&self, directory: &str) -> Result<(), AxlError> {
        self.record("doLdapSync", Call::LdapSync(directory.to_string()))
    }

    async fn get_ldap_sync_status(&self, directory: &str) -> Result<String, AxlError> {
        self.record("getLdapSyncStatus", Call::LdapStatus(directory.to_string()))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .ldap_statuses
            .pop_front()
            .unwrap_or_else(|| SYNC_RUNNING.to_string()))
    }

    async fn get_user(&self, userid: &str) -> Result<UserRecord, AxlError> {
        self.record("getUser", Call::GetUser(userid.to_string()))?;
        Ok(self.state.lock().unwrap().user.clone())
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<(), AxlError> {
        self.record("updateUser", Call::UpdateUser(update.clone()))?;
        if let Some(devices) = &update.associated_devices {
            self.state.lock().unwrap().user.associated_devices = devices.clone();
        }
        Ok(())
    }

    async fn add_phone(&self, phone: &PhonePayload) -> Result<(), AxlError> {
        self.record("addPhone", Call::AddPhone(phone.clone()))
    }

    async fn update_line(&self, update: &LineUpdate) -> Result<(), AxlError> {
        self.record("updateLine", Call::UpdateLine(update.clone()))
    }

    async fn update_phone_owner(&self, device: &str, owner: &str) -> Result<(), AxlError> {
        self.record(
            "updatePhone",
            Call::UpdateOwner(device.to_string(), owner.to_string()),
        )
    }
}

/// Hands out clones of one fake and remembers the credentials used
#[derive(Debug, Default)]
pub struct FakeConnector {
    pub api: FakeAxl,
    pub connects: Mutex<Vec<(Endpoint, Credentials)>>,
}

impl FakeConnector {
    pub fn new(api: FakeAxl) -> Self {
        Self {
            api,
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn usernames(&self) -> Vec<String> {
        self.connects
            .lock()
            .unwrap()
            .iter()
            .map(|(_, creds)| creds.username().to_string())
            .collect()
    }
}

impl Connector for FakeConnector {
    type Api = FakeAxl;

    fn connect(&self, endpoint: &Endpoint, credentials: &Credentials) -> Result<FakeAxl, AxlError> {
        self.connects
            .lock()
            .unwrap()
            .push((endpoint.clone(), credentials.clone()));
        Ok(self.api.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Select(usize),
    Text(&'static str),
    Secret(&'static str),
    Confirm(bool),
}

/// Replays answers in order; a prompt of the wrong kind fails the test,
/// running out of answers behaves like the operator pressing Esc
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    pub asked: RefCell<Vec<String>>,
    pub pauses: RefCell<usize>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, message: &str) -> Result<Answer, PromptError> {
        self.asked.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or(PromptError::Cancelled)
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, options: &[String]) -> Result<usize, PromptError> {
        match self.next(message)? {
            Answer::Select(index) => Ok(index),
            other => panic!("{:?} given for select {:?} ({:?})", other, message, options),
        }
    }

    fn text(&self, message: &str) -> Result<String, PromptError> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text.to_string()),
            other => panic!("{:?} given for text prompt {:?}", other, message),
        }
    }

    fn secret(&self, message: &str) -> Result<String, PromptError> {
        match self.next(message)? {
            Answer::Secret(secret) => Ok(secret.to_string()),
            other => panic!("{:?} given for secret prompt {:?}", other, message),
        }
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool, PromptError> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            other => panic!("{:?} given for confirm {:?}", other, message),
        }
    }

    fn pause(&self, _message: &str) -> Result<(), PromptError> {
        *self.pauses.borrow_mut() += 1;
        Ok(())
    }
}

/// Defaults with an instant LDAP poll
pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.ldap.poll_interval_ms = 0;
    settings.ldap.max_attempts = 5;
    settings
}

/// A credential store that already holds the operator's login
pub fn stored_credentials() -> MemoryStore {
    MemoryStore::new()
        .with("username", "username", "axladmin")
        .with("cucmpassword", "cucmpassword", "s3cret")
}

pub fn phone(name: &str, profile_uuid: Option<&str>) -> Phone {
    Phone {
        name: name.to_string(),
        current_profile: profile_uuid.map(|uuid| ProfileRef {
            name: Some(format!("{}-udp", name)),
            uuid: Some(uuid.to_string()),
        }),
        description: None,
    }
}

pub fn user(userid: &str, devices: &[&str]) -> UserRecord {
    UserRecord {
        userid: userid.to_string(),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        associated_devices: devices.iter().map(|d| d.to_string()).collect(),
    }
}
