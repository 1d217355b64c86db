//! Session-wide timing shared by every plugin.
pub mod plugin;

pub use plugin::{CorePlugin, SimulationClock};
