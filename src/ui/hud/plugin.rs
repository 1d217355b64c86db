// src/ui/hud/plugin.rs
//
// HudPlugin spawns the reward HUD and keeps it in sync with the ledger.

use bevy::prelude::*;

use crate::{
    host::ActiveHost,
    rewards::{ledger::RewardLedger, plugin::RewardSystems},
};

use super::systems::{
    handle_action_buttons, handle_main_button, refresh_hud, spawn_hud, style_action_buttons,
    sync_main_button_label,
};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud).add_systems(
            Update,
            (
                (handle_action_buttons, handle_main_button, style_action_buttons)
                    .before(RewardSystems),
                refresh_hud
                    .after(RewardSystems)
                    .run_if(resource_changed::<RewardLedger>),
                sync_main_button_label.run_if(resource_changed::<ActiveHost>),
            ),
        );
    }
}
