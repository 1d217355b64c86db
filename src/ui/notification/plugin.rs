// src/ui/notification/plugin.rs
//
// NotificationPlugin owns the notification slot and banner.

use bevy::prelude::*;

use crate::rewards::{config::RewardConfig, plugin::RewardSystems};

use super::{
    components::NotificationSlot,
    systems::{
        expire_notification, receive_notifications, render_notification,
        spawn_notification_banner,
    },
};

pub struct NotificationPlugin;

impl Plugin for NotificationPlugin {
    fn build(&self, app: &mut App) {
        let visible = app
            .world()
            .get_resource::<RewardConfig>()
            .map(|config| config.notification_visible)
            .unwrap_or_else(|| RewardConfig::default().notification_visible);

        app.insert_resource(NotificationSlot::new(visible))
            .add_systems(Startup, spawn_notification_banner)
            .add_systems(
                Update,
                (
                    expire_notification,
                    receive_notifications,
                    render_notification.run_if(resource_changed::<NotificationSlot>),
                )
                    .chain()
                    .after(RewardSystems),
            );
    }
}
