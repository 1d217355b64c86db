//! Host platform embed API and the desktop stand-in for it.
use std::{env, fmt};

use bevy::prelude::*;

const HOST_USER_ID_VAR: &str = "TONTAP_HOST_USER_ID";
const HOST_USERNAME_VAR: &str = "TONTAP_HOST_USERNAME";

/// The user that opened the app, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostUser {
    pub id: i64,
    pub username: Option<String>,
}

impl fmt::Display for HostUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(username) => write!(f, "@{} ({})", username, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Surface of the host platform the app relies on.
pub trait HostBridge: Send + Sync {
    fn platform(&self) -> &'static str;

    fn ready(&mut self);

    fn expand(&mut self);

    fn user(&self) -> Option<&HostUser>;

    fn set_main_button_text(&mut self, text: &str);

    fn main_button_text(&self) -> &str;

    fn close(&mut self);

    /// Hands a deep link (share sheet, channel) to the host.
    fn open_link(&mut self, url: &str);
}

/// Host used when the app runs as a native window instead of an embedded view.
#[derive(Debug, Default)]
pub struct DesktopHost {
    user: Option<HostUser>,
    main_button_text: String,
    ready: bool,
    expanded: bool,
}

impl DesktopHost {
    pub fn new(user: Option<HostUser>) -> Self {
        Self {
            user,
            ..Default::default()
        }
    }

    /// Reads the host identity from `TONTAP_HOST_USER_ID` / `TONTAP_HOST_USERNAME`.
    pub fn from_env() -> Self {
        let user = env::var(HOST_USER_ID_VAR).ok().and_then(|raw| {
            match raw.trim().parse::<i64>() {
                Ok(id) => Some(HostUser {
                    id,
                    username: env::var(HOST_USERNAME_VAR)
                        .ok()
                        .map(|value| value.trim().trim_start_matches('@').to_string())
                        .filter(|value| !value.is_empty()),
                }),
                Err(err) => {
                    warn!(
                        target: "host",
                        "Ignoring {}={:?} ({}); running without a host user.",
                        HOST_USER_ID_VAR,
                        raw,
                        err
                    );
                    None
                }
            }
        });
        Self::new(user)
    }
}

impl HostBridge for DesktopHost {
    fn platform(&self) -> &'static str {
        "desktop"
    }

    fn ready(&mut self) {
        self.ready = true;
    }

    fn expand(&mut self) {
        self.expanded = true;
    }

    fn user(&self) -> Option<&HostUser> {
        self.user.as_ref()
    }

    fn set_main_button_text(&mut self, text: &str) {
        self.main_button_text = text.to_string();
    }

    fn main_button_text(&self) -> &str {
        &self.main_button_text
    }

    fn close(&mut self) {
        info!(target: "host", "Desktop host closing (ready={}, expanded={})", self.ready, self.expanded);
    }

    fn open_link(&mut self, url: &str) {
        info!(target: "host", "Open link requested: {}", url);
    }
}

/// Resource holding the active host bridge.
#[derive(Resource)]
pub struct ActiveHost(Box<dyn HostBridge>);

impl ActiveHost {
    pub fn new(host: Box<dyn HostBridge>) -> Self {
        Self(host)
    }

    pub fn host(&self) -> &dyn HostBridge {
        self.0.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn HostBridge {
        self.0.as_mut()
    }
}

#[cfg(test)]
pub use recording::{HostCall, RecordingHost};


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_host_tracks_main_button_text() {
        let mut host = DesktopHost::new(Some(HostUser {
            id: 5,
            username: Some("alice".into()),
        }));
        host.ready();
        host.expand();
        host.set_main_button_text("Close App");

        assert_eq!(host.main_button_text(), "Close App");
        assert_eq!(host.user().map(|user| user.id), Some(5));
        assert_eq!(host.user().unwrap().to_string(), "@alice (5)");
    }
}
