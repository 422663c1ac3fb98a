//! Classification of AXL failures
//!
//! CUCM reports most problems as SOAP faults whose only stable identifier
//! is the fault text. Workflows never match on that text themselves; they
//! ask for a [`FaultKind`] and branch on the variant.

use crate::utils::AxlError;
use std::fmt;

const LINE_NOT_FOUND: &str = "Item not valid: The specified Line was not found";
/// CUCM's own spelling
const UNKNOWN_FAULT: &str = "Unknown fault occured";
const DUPLICATE_ROW: &str = "duplicate value in a UNIQUE INDEX";

/// Known kinds of AXL failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The directory number does not exist in the partition
    LineNotFound,
    /// Bad credentials, or the generic fault CUCM returns for them
    Authentication,
    /// A device or row with the same unique key already exists
    DuplicateDevice,
    /// Anything else; always fatal
    Unclassified,
}

impl FaultKind {
    pub fn classify(err: &AxlError) -> Self {
        match err {
            AxlError::Fault { message, .. } => Self::classify_message(message),
            AxlError::Http { status, .. } if *status == 401 || *status == 403 => {
                FaultKind::Authentication
            }
            _ => FaultKind::Unclassified,
        }
    }

    pub fn classify_message(message: &str) -> Self {
        let message = message.trim();
        if message == LINE_NOT_FOUND {
            FaultKind::LineNotFound
        } else if message == UNKNOWN_FAULT {
            FaultKind::Authentication
        } else if message.contains(DUPLICATE_ROW) {
            FaultKind::DuplicateDevice
        } else {
            FaultKind::Unclassified
        }
    }

    /// Whether a workflow may offer the operator a way forward
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FaultKind::LineNotFound | FaultKind::Authentication)
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::LineNotFound => write!(f, "line not found"),
            FaultKind::Authentication => write!(f, "authentication failure"),
            FaultKind::DuplicateDevice => write!(f, "duplicate device"),
            FaultKind::Unclassified => write!(f, "unclassified fault"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fault_strings() {
        assert_eq!(
            FaultKind::classify(&AxlError::fault(LINE_NOT_FOUND)),
            FaultKind::LineNotFound
        );
        assert_eq!(
            FaultKind::classify(&AxlError::fault("Unknown fault occured")),
            FaultKind::Authentication
        );
        assert_eq!(
            FaultKind::classify(&AxlError::fault(
                "Could not insert new row - duplicate value in a UNIQUE INDEX column (Unique Index:)."
            )),
            FaultKind::DuplicateDevice
        );
    }

    #[test]
    fn test_http_auth_statuses() {
        for status in [401, 403] {
            let err = AxlError::Http {
                status,
                body: String::new(),
            };
            assert_eq!(FaultKind::classify(&err), FaultKind::Authentication);
        }
        let err = AxlError::Http {
            status: 503,
            body: String::new(),
        };
        assert_eq!(FaultKind::classify(&err), FaultKind::Unclassified);
    }

    #[test]
    fn test_everything_else_is_unclassified_and_fatal() {
        let kind = FaultKind::classify(&AxlError::fault("Item not valid: The specified User was not found"));
        assert_eq!(kind, FaultKind::Unclassified);
        assert!(!kind.is_recoverable());
        assert!(!FaultKind::DuplicateDevice.is_recoverable());
        assert!(FaultKind::LineNotFound.is_recoverable());
        assert!(FaultKind::Authentication.is_recoverable());
    }
}
