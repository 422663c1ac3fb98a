//! AXL credentials and the OS credential store
//!
//! The username and password are kept under fixed service/account pairs
//! in the platform keyring. When either is missing, or after the server
//! rejects them, the operator is asked again and the new values replace
//! the stored ones.

use crate::config::CredentialSettings;
use crate::output::Prompter;
use crate::utils::{CredentialError, WorkflowError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// AXL basic-auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Secret storage keyed by service and account
pub trait CredentialStore {
    /// `Ok(None)` when nothing is stored
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError>;
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError>;
}

/// The platform keyring (macOS Keychain, Windows Credential Manager,
/// Secret Service / keyutils on Linux)
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

fn store_error(service: &str, err: keyring::Error) -> CredentialError {
    CredentialError::Store {
        service: service.to_string(),
        message: err.to_string(),
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError> {
        let entry = keyring::Entry::new(service, account).map_err(|e| store_error(service, e))?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_error(service, e)),
        }
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError> {
        let entry = keyring::Entry::new(service, account).map_err(|e| store_error(service, e))?;
        entry
            .set_password(secret)
            .map_err(|e| store_error(service, e))
    }
}

/// In-process store, for tests and for runs without a keyring
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, service: &str, account: &str, secret: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert((service.to_string(), account.to_string()), secret.to_string());
        }
        self
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError> {
        let entries = self.entries.lock().map_err(|e| CredentialError::Store {
            service: service.to_string(),
            message: e.to_string(),
        })?;
        Ok(entries
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.lock().map_err(|e| CredentialError::Store {
            service: service.to_string(),
            message: e.to_string(),
        })?;
        entries.insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }
}

/// Resolves credentials from the store, asking the operator when needed
pub struct CredentialProvider<'a> {
    store: &'a dyn CredentialStore,
    prompter: &'a dyn Prompter,
    settings: &'a CredentialSettings,
}

impl<'a> CredentialProvider<'a> {
    pub fn new(
        store: &'a dyn CredentialStore,
        prompter: &'a dyn Prompter,
        settings: &'a CredentialSettings,
    ) -> Self {
        Self {
            store,
            prompter,
            settings,
        }
    }

    /// Stored credentials, or freshly entered ones when nothing is stored
    /// or `reset` is set. Entered values are written back to the store.
    pub fn resolve(&self, reset: bool) -> Result<Credentials, WorkflowError> {
        let (username, entered) = self.value(
            reset,
            &self.settings.username_service,
            &self.settings.username_account,
            "Please enter your CUCM username:",
            "username",
        )?;
        if entered {
            self.log_stored(&username, "username", &self.settings.username_service);
        }

        let (password, entered) = self.value(
            reset,
            &self.settings.password_service,
            &self.settings.password_account,
            "Please enter your CUCM password:",
            "password",
        )?;
        if entered {
            self.log_stored(&username, "password", &self.settings.password_service);
        }
        Ok(Credentials::new(username, password))
    }

    /// The value plus whether it was freshly entered and written back
    fn value(
        &self,
        reset: bool,
        service: &str,
        account: &str,
        prompt: &str,
        what: &'static str,
    ) -> Result<(String, bool), WorkflowError> {
        if !reset {
            if let Some(stored) = self.store.get(service, account)? {
                if !stored.is_empty() {
                    return Ok((stored, false));
                }
            }
        }

        let entered = self.prompter.secret(prompt)?;
        let entered = entered.trim();
        if entered.is_empty() {
            return Err(CredentialError::Empty { what }.into());
        }
        self.store.set(service, account, entered)?;
        Ok((entered.to_string(), true))
    }

    fn log_stored(&self, operator: &str, what: &str, service: &str) {
        tracing::info!(operator, service, "Stored new CUCM {} in credential store", what);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::PromptError;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct Secrets(RefCell<VecDeque<String>>);

    impl Secrets {
        fn new(values: &[&str]) -> Self {
            Secrets(RefCell::new(values.iter().map(|v| v.to_string()).collect()))
        }
    }

    impl Prompter for Secrets {
        fn select(&self, _: &str, _: &[String]) -> Result<usize, PromptError> {
            unreachable!()
        }
        fn text(&self, _: &str) -> Result<String, PromptError> {
            unreachable!()
        }
        fn secret(&self, _: &str) -> Result<String, PromptError> {
            self.0.borrow_mut().pop_front().ok_or(PromptError::Cancelled)
        }
        fn confirm(&self, _: &str, _: bool) -> Result<bool, PromptError> {
            unreachable!()
        }
        fn pause(&self, _: &str) -> Result<(), PromptError> {
            Ok(())
        }
    }

    #[test]
    fn test_stored_credentials_are_used_without_prompting() {
        let settings = CredentialSettings::default();
        let store = MemoryStore::new()
            .with("username", "username", "axladmin")
            .with("cucmpassword", "cucmpassword", "s3cret");
        let prompter = Secrets::new(&[]);

        let creds = CredentialProvider::new(&store, &prompter, &settings)
            .resolve(false)
            .unwrap();
        assert_eq!(creds.username(), "axladmin");
        assert_eq!(creds.password(), "s3cret");
    }

    #[test]
    fn test_reset_prompts_and_persists() {
        let settings = CredentialSettings::default();
        let store = MemoryStore::new()
            .with("username", "username", "old")
            .with("cucmpassword", "cucmpassword", "old");
        let prompter = Secrets::new(&["newuser", "newpass"]);

        let creds = CredentialProvider::new(&store, &prompter, &settings)
            .resolve(true)
            .unwrap();
        assert_eq!(creds, Credentials::new("newuser", "newpass"));
        assert_eq!(
            store.get("cucmpassword", "cucmpassword").unwrap().as_deref(),
            Some("newpass")
        );
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        let settings = CredentialSettings::default();
        let store = MemoryStore::new();
        let prompter = Secrets::new(&["  "]);

        let err = CredentialProvider::new(&store, &prompter, &settings)
            .resolve(false)
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Credential(CredentialError::Empty { what: "username" })
        ));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stored_entries_are_logged_with_operator() {
        let settings = CredentialSettings::default();
        let store = MemoryStore::new();
        let prompter = Secrets::new(&["newuser", "newpass"]);
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            CredentialProvider::new(&store, &prompter, &settings)
                .resolve(false)
                .unwrap();
        });

        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let stored: Vec<&str> = log
            .lines()
            .filter(|line| line.contains("Stored new CUCM"))
            .collect();
        assert_eq!(stored.len(), 2);
        assert!(stored
            .iter()
            .all(|line| line.contains("operator=") && line.contains("newuser")));
        assert!(!log.contains("newpass"));
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("axladmin", "s3cret");
        assert!(!format!("{:?}", creds).contains("s3cret"));
    }
}
