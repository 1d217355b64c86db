// src/ui/mod.rs
//
// UI module providing the screen-space presentation surface for the rewards app.
//
// Current features:
// - HUD (balance, counters, quest bar, referral link, action buttons, main button)
// - Notification banner (single slot, replaced by each new notice)

pub mod hud;
pub mod notification;
pub mod plugin;

pub use plugin::UiPlugin;
