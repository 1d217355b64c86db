// src/ui/notification/mod.rs
//
// Transient notification banner shown at the top of the screen.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::NotificationPlugin;
