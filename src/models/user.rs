//! End users and directory numbers

/// End user as returned by `getUser`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRecord {
    pub userid: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub associated_devices: Vec<String>,
}

impl UserRecord {
    /// "First Last", falling back to the user id when the directory has no names
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.userid.clone()
        } else {
            parts.join(" ")
        }
    }

    /// Display and alerting name: "Last, F"
    pub fn display_name(&self) -> String {
        let last = self
            .last_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let initial = self
            .first_name
            .as_deref()
            .and_then(|first| first.trim().chars().next());

        match (last, initial) {
            (Some(last), Some(initial)) => format!("{}, {}", last, initial),
            (Some(last), None) => last.to_string(),
            (None, _) => self.full_name(),
        }
    }

    /// Device association list after adding `new_devices`.
    ///
    /// Existing associations are always kept and keep their order; new
    /// devices are appended unless already present.
    pub fn devices_with(&self, new_devices: &[String]) -> Vec<String> {
        merge_devices(&self.associated_devices, new_devices)
    }
}

/// Additive merge of device association lists
pub fn merge_devices(existing: &[String], new_devices: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for device in new_devices {
        if !merged.iter().any(|d| d.eq_ignore_ascii_case(device)) {
            merged.push(device.clone());
        }
    }
    merged
}

/// Directory number as returned by `getLine`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineInfo {
    pub pattern: String,
    pub route_partition: Option<String>,
    pub description: Option<String>,
    pub associated_devices: Vec<String>,
}
