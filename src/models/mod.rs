//! Data models for the AXL workflows
//!
//! Transient records built from AXL responses and operator input.

pub mod build;
pub mod phone;
pub mod user;

pub use build::{
    soft_client_device_name, BuildPlan, BuildTarget, BuildType, DeskPhone, DeskPhoneModel,
    MacAddress, MacError, PhoneBuildRequest, Protocol,
};
pub use phone::{logged_in_phone_names, Phone, ProfileRef};
pub use user::{merge_devices, LineInfo, UserRecord};
