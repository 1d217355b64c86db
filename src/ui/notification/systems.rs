// src/ui/notification/systems.rs
//
// Systems feeding notices into the slot, expiring them, and drawing the banner.

use bevy::prelude::*;

use crate::{core::SimulationClock, rewards::events::NotificationRequested};

use super::components::{NotificationBanner, NotificationSlot, NotificationText};

const BANNER_COLOR: Color = Color::srgba(0.0, 0.45, 0.8, 0.95);
const TEXT_COLOR: Color = Color::WHITE;
const TEXT_FONT_SIZE: f32 = 16.0;

pub fn spawn_notification_banner(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Percent(10.0),
                right: Val::Percent(10.0),
                padding: UiRect::all(Val::Px(12.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(BANNER_COLOR),
            GlobalZIndex(10),
            Visibility::Hidden,
            NotificationBanner,
            Name::new("Notification Banner"),
        ))
        .with_children(|banner| {
            banner.spawn((
                Text::new(""),
                TextFont {
                    font_size: TEXT_FONT_SIZE,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                NotificationText,
            ));
        });
}

/// Only the last notice of a frame survives; earlier ones are replaced.
pub fn receive_notifications(
    mut notices: MessageReader<NotificationRequested>,
    mut slot: ResMut<NotificationSlot>,
) {
    for notice in notices.read() {
        info!(target: "ui", "Notification: {}", notice.text);
        slot.show(notice.text.clone());
    }
}

pub fn expire_notification(clock: Res<SimulationClock>, mut slot: ResMut<NotificationSlot>) {
    let delta = clock.last_scaled_delta();
    if slot.is_visible() && slot.tick(delta) {
        debug!(target: "ui", "Notification hidden");
    }
}

pub fn render_notification(
    slot: Res<NotificationSlot>,
    mut banners: Query<&mut Visibility, With<NotificationBanner>>,
    mut texts: Query<&mut Text, With<NotificationText>>,
) {
    let visibility = if slot.is_visible() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut banner in banners.iter_mut() {
        banner.set_if_neq(visibility);
    }

    if let Some(current) = slot.current() {
        for mut text in texts.iter_mut() {
            if text.0 != current {
                text.0 = current.to_string();
            }
        }
    }
}
