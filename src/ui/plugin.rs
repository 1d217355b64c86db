// src/ui/plugin.rs
//
// UiPlugin groups the HUD and notification plugins.

use bevy::prelude::*;

use super::{hud::HudPlugin, notification::NotificationPlugin};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.add_plugins((HudPlugin, NotificationPlugin));
    }
}
