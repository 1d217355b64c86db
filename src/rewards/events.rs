//! Messages exchanged between the HUD, the host bridge and the reward systems.
use bevy::prelude::Message;

use super::{actions::ActionKind, ledger::LedgerEntry};

/// A button press asking the ledger to run an action.
#[derive(Message, Debug, Clone, Copy)]
pub struct RewardActionRequested {
    pub action: ActionKind,
}

/// Text for the transient notification slot.
#[derive(Message, Debug, Clone)]
pub struct NotificationRequested {
    pub text: String,
}

impl NotificationRequested {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Emitted for every balance movement the ledger applies.
#[derive(Message, Debug, Clone, Copy)]
pub struct LedgerEntryRecorded {
    pub entry: LedgerEntry,
}
