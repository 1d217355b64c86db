//! Clipboard service used by the copy-link action.
use std::fmt;

use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    Denied { reason: String },
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied { reason } => write!(f, "clipboard write denied: {}", reason),
        }
    }
}

impl std::error::Error for ClipboardError {}

pub trait ClipboardService: Send + Sync {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard scoped to the running session.
#[derive(Debug, Default)]
pub struct SessionClipboard {
    contents: Option<String>,
}

impl SessionClipboard {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardService for SessionClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        debug!(target: "host", "Clipboard <- {}", text);
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Resource)]
pub struct ActiveClipboard(Box<dyn ClipboardService>);

impl ActiveClipboard {
    pub fn new(service: Box<dyn ClipboardService>) -> Self {
        Self(service)
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.write_text(text)
    }
}

#[cfg(test)]
pub use fakes::{DeniedClipboard, SharedClipboard};

#[cfg(test)]
mod fakes {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Always refuses, like a browser without clipboard permission.
    #[derive(Debug, Default)]
    pub struct DeniedClipboard;

    impl ClipboardService for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied {
                reason: "permission not granted".into(),
            })
        }
    }

    /// Clipboard whose contents stay observable after being boxed.
    #[derive(Debug, Clone, Default)]
    pub struct SharedClipboard {
        contents: Arc<Mutex<Option<String>>>,
    }

    impl SharedClipboard {
        pub fn contents(&self) -> Option<String> {
            self.contents.lock().unwrap().clone()
        }
    }

    impl ClipboardService for SharedClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }
}
