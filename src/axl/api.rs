//! The AXL operations used by the workflows
//!
//! Workflows are written against [`AxlApi`] rather than the SOAP client so
//! they can be driven by a scripted fake in tests.

use super::payload::{LineUpdate, PhonePayload, UserUpdate};
use crate::models::{LineInfo, Phone, UserRecord};
use crate::utils::AxlError;
use async_trait::async_trait;

#[async_trait]
pub trait AxlApi: Send + Sync {
    /// `listPhone` with a name pattern (`%` matches anything)
    async fn list_phones(&self, name_pattern: &str) -> Result<Vec<Phone>, AxlError>;

    /// `doDeviceLogout`
    async fn do_device_logout(&self, device: &str) -> Result<(), AxlError>;

    /// `getLine`
    async fn get_line(&self, pattern: &str, route_partition: &str) -> Result<LineInfo, AxlError>;

    /// `removePhone`
    async fn remove_phone(&self, name: &str) -> Result<(), AxlError>;

    /// `doLdapSync` with `sync=true`
    async fn do_ldap_sync(&self, directory: &str) -> Result<(), AxlError>;

    /// `getLdapSyncStatus`; returns the status text as reported
    async fn get_ldap_sync_status(&self, directory: &str) -> Result<String, AxlError>;

    /// `getUser`
    async fn get_user(&self, userid: &str) -> Result<UserRecord, AxlError>;

    /// `updateUser`
    async fn update_user(&self, update: &UserUpdate) -> Result<(), AxlError>;

    /// `addPhone`
    async fn add_phone(&self, phone: &PhonePayload) -> Result<(), AxlError>;

    /// `updateLine`
    async fn update_line(&self, update: &LineUpdate) -> Result<(), AxlError>;

    /// `updatePhone` setting only the owner user id
    async fn update_phone_owner(&self, device: &str, owner: &str) -> Result<(), AxlError>;
}
