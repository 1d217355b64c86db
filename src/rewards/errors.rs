//! Error types surfaced by snapshot persistence and reward actions.
use std::{fmt, io};

use super::actions::ActionKind;

/// Why a persisted snapshot could not be adopted.
#[derive(Debug)]
pub enum SnapshotError {
    Malformed { message: String },
    UnsupportedVersion { found: u64 },
    InvalidField { field: &'static str, reason: String },
}

impl SnapshotError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { message } => write!(f, "malformed snapshot: {}", message),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported snapshot version {}", found)
            }
            Self::InvalidField { field, reason } => {
                write!(f, "invalid snapshot field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::malformed(value.to_string())
    }
}

/// Failure talking to the snapshot store.
#[derive(Debug)]
pub struct StoreError {
    pub operation: StoreOperation,
    pub source: io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Read,
    Write,
    Quarantine,
}

impl StoreError {
    pub fn new(operation: StoreOperation, source: io::Error) -> Self {
        Self { operation, source }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.operation {
            StoreOperation::Read => "read",
            StoreOperation::Write => "write",
            StoreOperation::Quarantine => "quarantine",
        };
        write!(f, "snapshot store {} failed: {}", label, self.source)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Failure restoring or persisting the ledger snapshot.
#[derive(Debug)]
pub enum LedgerError {
    Store(StoreError),
    Snapshot(SnapshotError),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{}", err),
            Self::Snapshot(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SnapshotError> for LedgerError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// Reasons an action request is turned away before anything is scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRejection {
    AlreadyInFlight { action: ActionKind },
    HostUserMissing,
    WalletNotConnected,
    WalletAlreadyConnected,
    BelowMinimumWithdrawal { minimum: String },
}

impl ActionRejection {
    /// Notification text shown for the rejection, if the user should see one.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::AlreadyInFlight { action } => {
                Some(format!("{} already in progress...", action.label()))
            }
            Self::HostUserMissing => None,
            Self::WalletNotConnected => Some("Please connect your wallet first!".to_string()),
            Self::WalletAlreadyConnected => Some("Wallet already connected!".to_string()),
            Self::BelowMinimumWithdrawal { minimum } => {
                Some(format!("Minimum withdrawal amount: {} TON", minimum))
            }
        }
    }
}

impl fmt::Display for ActionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInFlight { action } => write!(f, "{} already in flight", action),
            Self::HostUserMissing => write!(f, "host user identity missing"),
            Self::WalletNotConnected => write!(f, "wallet not connected"),
            Self::WalletAlreadyConnected => write!(f, "wallet already connected"),
            Self::BelowMinimumWithdrawal { minimum } => {
                write!(f, "balance below minimum withdrawal of {} TON", minimum)
            }
        }
    }
}

impl std::error::Error for ActionRejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_notices_match_user_facing_text() {
        assert_eq!(
            ActionRejection::WalletNotConnected.notice().as_deref(),
            Some("Please connect your wallet first!")
        );
        assert_eq!(
            ActionRejection::BelowMinimumWithdrawal {
                minimum: "0.01".into()
            }
            .notice()
            .as_deref(),
            Some("Minimum withdrawal amount: 0.01 TON")
        );
        assert!(ActionRejection::HostUserMissing.notice().is_none());
        assert!(ActionRejection::AlreadyInFlight {
            action: ActionKind::WatchAd
        }
        .to_string()
        .contains("watch_ad"));
    }

    #[test]
    fn store_error_reports_operation() {
        let err = StoreError::new(
            StoreOperation::Write,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("write"));
        assert!(err.to_string().contains("denied"));

        let load: LedgerError = SnapshotError::UnsupportedVersion { found: 9 }.into();
        assert_eq!(load.to_string(), "unsupported snapshot version 9");
    }
}
