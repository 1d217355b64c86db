// src/ui/notification/components.rs
//
// The single notification slot and the banner entities that display it.

use std::time::Duration;

use bevy::prelude::*;

/// Banner container toggled visible while a notice is showing.
#[derive(Component, Debug)]
pub struct NotificationBanner;

#[derive(Component, Debug)]
pub struct NotificationText;

/// One visible notice at a time. A new notice replaces the current one and
/// restarts the visibility timer.
#[derive(Resource, Debug)]
pub struct NotificationSlot {
    text: Option<String>,
    visible_for: Timer,
}

impl NotificationSlot {
    pub fn new(visible: Duration) -> Self {
        Self {
            text: None,
            visible_for: Timer::new(visible, TimerMode::Once),
        }
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.visible_for.reset();
    }

    pub fn current(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    /// Returns `true` on the tick that hides the notice.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.text.is_none() {
            return false;
        }
        if self.visible_for.tick(delta).is_finished() {
            self.text = None;
            return true;
        }
        false
    }
}

impl Default for NotificationSlot {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}
