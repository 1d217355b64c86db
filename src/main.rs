use std::path::Path;

use bevy::prelude::*;

mod core;
mod host;
mod rewards;
mod ui;

use crate::{
    core::CorePlugin,
    host::HostPlugin,
    rewards::RewardsPlugin,
    ui::UiPlugin,
};

fn main() {
    load_host_env();

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "TONTap".into(),
                    ..default()
                }),
                ..default()
            }),
            CorePlugin::default(),
            HostPlugin,
            RewardsPlugin::default(), // Reads config/rewards.toml once logging is up
            UiPlugin, // After RewardsPlugin so the notification slot can read the config
        ))
        .run();
}

fn load_host_env() {
    const HOST_ENV_FILE: &str = "host.env";

    let path = Path::new(HOST_ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", HOST_ENV_FILE, err);
    }
}
