//! Host plugin installing the bridge, the clipboard and the close flow.
use bevy::prelude::*;

use super::{
    bridge::{ActiveHost, DesktopHost},
    clipboard::{ActiveClipboard, SessionClipboard},
    events::HostCloseRequested,
    systems::{announce_ready, close_on_request, handle_back_navigation},
};

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ActiveHost::new(Box::new(DesktopHost::from_env())))
            .insert_resource(ActiveClipboard::new(Box::new(SessionClipboard::default())))
            .add_message::<HostCloseRequested>()
            .add_systems(Startup, announce_ready)
            .add_systems(Update, (handle_back_navigation, close_on_request).chain());
    }
}
