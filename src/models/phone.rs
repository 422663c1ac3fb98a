//! Phones as returned by the listing operation

/// Reference to the Extension Mobility profile a phone is logged into
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileRef {
    pub name: Option<String>,
    pub uuid: Option<String>,
}

/// A phone from `listPhone`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    pub name: String,
    pub current_profile: Option<ProfileRef>,
    pub description: Option<String>,
}

impl Phone {
    /// True when an Extension Mobility profile is logged in on this phone
    pub fn is_logged_in(&self) -> bool {
        self.current_profile
            .as_ref()
            .and_then(|profile| profile.uuid.as_deref())
            .is_some_and(|uuid| !uuid.trim().is_empty())
    }
}

/// Names of the logged-in phones, in listing order
pub fn logged_in_phone_names(phones: &[Phone]) -> Vec<String> {
    phones
        .iter()
        .filter(|phone| phone.is_logged_in())
        .map(|phone| phone.name.clone())
        .collect()
}
