//! Host lifecycle: startup handshake, back navigation and closing.
use bevy::prelude::*;

use crate::rewards::actions::ActiveActionBackend;

use super::{
    bridge::ActiveHost,
    events::{CloseSource, HostCloseRequested},
};

pub const MAIN_BUTTON_TEXT: &str = "Close App";

pub fn announce_ready(mut host: ResMut<ActiveHost>) {
    let host = host.host_mut();
    host.ready();
    host.expand();
    host.set_main_button_text(MAIN_BUTTON_TEXT);

    match host.user() {
        Some(user) => info!(
            target: "host",
            "{} host ready for user {}",
            host.platform(),
            user
        ),
        None => info!(
            target: "host",
            "{} host ready without a user identity",
            host.platform()
        ),
    }
}

/// Escape stands in for the host's back button.
pub fn handle_back_navigation(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut requests: MessageWriter<HostCloseRequested>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };
    if keyboard.just_pressed(KeyCode::Escape) {
        requests.write(HostCloseRequested {
            source: CloseSource::BackNavigation,
        });
    }
}

/// Drops in-flight actions, tells the host, and exits the app.
pub fn close_on_request(
    mut requests: MessageReader<HostCloseRequested>,
    mut host: ResMut<ActiveHost>,
    backend: Option<ResMut<ActiveActionBackend>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    if let Some(mut backend) = backend {
        let dropped = backend.backend_mut().cancel_all();
        if dropped > 0 {
            warn!(
                target: "host",
                "Closing with {} pending action(s); they will not complete",
                dropped
            );
        }
    }

    debug!(target: "host", "Close requested via {:?}", request.source);
    host.host_mut().close();
    exit.write(AppExit::Success);
}
