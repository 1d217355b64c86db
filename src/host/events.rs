//! Messages raised by the host chrome.
use bevy::prelude::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseSource {
    MainButton,
    BackNavigation,
}

/// The user asked the host to dismiss the app.
#[derive(Message, Debug, Clone, Copy)]
pub struct HostCloseRequested {
    pub source: CloseSource,
}
