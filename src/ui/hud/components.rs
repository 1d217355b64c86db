// src/ui/hud/components.rs
//
// Marker components for the HUD entity tree.

use bevy::prelude::*;

use crate::rewards::actions::ActionKind;

/// Root node of the HUD.
#[derive(Component, Debug)]
pub struct HudRoot;

/// Text entity mirroring one field of the projection.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudSlot {
    Balance,
    TotalEarned,
    AdsWatched,
    Referrals,
    QuestCurrent,
    ReferralLink,
}

/// Inner fill of the quest progress bar; its width is the quest percentage.
#[derive(Component, Debug)]
pub struct QuestProgressBar;

/// Button that requests one reward action when pressed.
#[derive(Component, Debug, Clone, Copy)]
pub struct ActionButton {
    pub action: ActionKind,
}

/// Stand-in for the host's main button.
#[derive(Component, Debug)]
pub struct MainButton;

#[derive(Component, Debug)]
pub struct MainButtonLabel;
