//! Host module: the platform embed bridge, clipboard, and app lifecycle.
pub mod bridge;
pub mod clipboard;
pub mod events;
pub mod plugin;
pub mod systems;

pub use bridge::ActiveHost;
pub use clipboard::ActiveClipboard;
pub use plugin::HostPlugin;

#[cfg(test)]
pub use bridge::{HostCall, RecordingHost};
#[cfg(test)]
pub use clipboard::{DeniedClipboard, SharedClipboard};
