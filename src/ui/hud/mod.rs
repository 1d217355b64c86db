// src/ui/hud/mod.rs
//
// Reward HUD: balance, counters, quest bar, referral link and action buttons.

pub mod components;
pub mod plugin;
pub mod projection;
pub mod systems;

pub use plugin::HudPlugin;
