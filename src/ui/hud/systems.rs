// src/ui/hud/systems.rs
//
// Systems for spawning the HUD, mirroring the ledger into it, and turning
// button presses into reward and host messages.

use bevy::prelude::*;

use crate::{
    host::{
        events::{CloseSource, HostCloseRequested},
        ActiveHost,
    },
    rewards::{
        actions::ActionKind, config::RewardConfig, events::RewardActionRequested,
        ledger::RewardLedger,
    },
};

use super::{
    components::{ActionButton, HudRoot, HudSlot, MainButton, MainButtonLabel, QuestProgressBar},
    projection::HudProjection,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgb(0.07, 0.09, 0.13);
const CARD_COLOR: Color = Color::srgba(0.14, 0.17, 0.24, 0.95);
const BORDER_COLOR: Color = Color::srgb(0.25, 0.3, 0.4);
const ACCENT_COLOR: Color = Color::srgb(0.0, 0.6, 1.0); // TON blue
const TEXT_COLOR: Color = Color::WHITE;
const MUTED_TEXT_COLOR: Color = Color::srgb(0.65, 0.7, 0.8);
const BUTTON_COLOR: Color = Color::srgba(0.18, 0.22, 0.3, 0.95);
const BUTTON_HOVER_COLOR: Color = Color::srgba(0.24, 0.3, 0.42, 0.95);
const BUTTON_PRESSED_COLOR: Color = Color::srgb(0.0, 0.45, 0.8);

const TITLE_FONT_SIZE: f32 = 28.0;
const BALANCE_FONT_SIZE: f32 = 36.0;
const LABEL_FONT_SIZE: f32 = 14.0;
const VALUE_FONT_SIZE: f32 = 20.0;
const BUTTON_FONT_SIZE: f32 = 16.0;

const EARNING_ACTIONS: [ActionKind; 4] = [
    ActionKind::WatchAd,
    ActionKind::TapAd,
    ActionKind::VisitSite,
    ActionKind::FollowChannel,
];
const REFERRAL_ACTIONS: [ActionKind; 2] = [ActionKind::ShareReferral, ActionKind::CopyReferral];
const WALLET_ACTIONS: [ActionKind; 2] = [ActionKind::ConnectWallet, ActionKind::Withdraw];

pub fn spawn_hud(mut commands: Commands, config: Res<RewardConfig>) {
    commands.spawn(Camera2d);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(16.0)),
                row_gap: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            HudRoot,
            Name::new("HUD Root"),
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("💎 TONTap"),
                TextFont {
                    font_size: TITLE_FONT_SIZE,
                    ..default()
                },
                TextColor(ACCENT_COLOR),
            ));

            // Balance card
            root.spawn(card_node()).with_children(|card| {
                card.spawn(label("Balance"));
                card.spawn((slot_text(BALANCE_FONT_SIZE), HudSlot::Balance));
            });

            // Stats row
            root.spawn(Node {
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|row| {
                for (caption, slot) in [
                    ("Total earned", HudSlot::TotalEarned),
                    ("Ads watched", HudSlot::AdsWatched),
                    ("Referrals", HudSlot::Referrals),
                ] {
                    row.spawn(card_node()).with_children(|card| {
                        card.spawn(label(caption));
                        card.spawn((slot_text(VALUE_FONT_SIZE), slot));
                    });
                }
            });

            // Daily quest
            root.spawn(card_node()).with_children(|card| {
                card.spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(4.0),
                    ..default()
                })
                .with_children(|header| {
                    header.spawn(label("Daily quest: invite friends"));
                    header.spawn((slot_text(LABEL_FONT_SIZE), HudSlot::QuestCurrent));
                    header.spawn(label(&format!("/ {}", config.quest_steps)));
                });
                card.spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(8.0),
                        margin: UiRect::top(Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_COLOR),
                ))
                .with_children(|track| {
                    track.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(ACCENT_COLOR),
                        QuestProgressBar,
                    ));
                });
            });

            for (caption, actions) in [
                ("Earn", &EARNING_ACTIONS[..]),
                ("Invite", &REFERRAL_ACTIONS[..]),
                ("Wallet", &WALLET_ACTIONS[..]),
            ] {
                root.spawn(label(caption));
                root.spawn(Node {
                    flex_direction: FlexDirection::Row,
                    flex_wrap: FlexWrap::Wrap,
                    column_gap: Val::Px(8.0),
                    row_gap: Val::Px(8.0),
                    ..default()
                })
                .with_children(|row| {
                    for &action in actions {
                        row.spawn((
                            button_node(),
                            Button,
                            Interaction::None,
                            BackgroundColor(BUTTON_COLOR),
                            BorderColor::from(BORDER_COLOR),
                            ActionButton { action },
                            Name::new(format!("Action Button {}", action)),
                        ))
                        .with_children(|button| {
                            button.spawn(button_text(action.button_label()));
                        });
                    }
                });
            }

            root.spawn((slot_text(LABEL_FONT_SIZE), HudSlot::ReferralLink));

            root.spawn((
                Node {
                    margin: UiRect::top(Val::Auto),
                    ..button_node()
                },
                Button,
                Interaction::None,
                BackgroundColor(ACCENT_COLOR),
                BorderColor::from(ACCENT_COLOR),
                MainButton,
                Name::new("Main Button"),
            ))
            .with_children(|button| {
                button.spawn((button_text(""), MainButtonLabel));
            });
        });

    info!("HUD spawned with {} action buttons", ActionKind::ALL.len());
}

fn card_node() -> (Node, BackgroundColor, BorderColor) {
    (
        Node {
            flex_direction: FlexDirection::Column,
            flex_grow: 1.0,
            padding: UiRect::all(Val::Px(12.0)),
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
        BackgroundColor(CARD_COLOR),
        BorderColor::from(BORDER_COLOR),
    )
}

fn button_node() -> Node {
    Node {
        padding: UiRect::axes(Val::Px(14.0), Val::Px(10.0)),
        border: UiRect::all(Val::Px(1.0)),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

fn label(text: &str) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: LABEL_FONT_SIZE,
            ..default()
        },
        TextColor(MUTED_TEXT_COLOR),
    )
}

fn slot_text(font_size: f32) -> (Text, TextFont, TextColor) {
    (
        Text::new(""),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
    )
}

fn button_text(text: &str) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: BUTTON_FONT_SIZE,
            ..default()
        },
        TextColor(TEXT_COLOR),
    )
}

/// Writes the current projection into every HUD slot.
pub fn refresh_hud(
    ledger: Res<RewardLedger>,
    config: Res<RewardConfig>,
    mut slots: Query<(&HudSlot, &mut Text)>,
    mut bars: Query<&mut Node, With<QuestProgressBar>>,
) {
    let projection = HudProjection::from_state(
        ledger.state(),
        ledger.quest_steps(),
        &config.referral.bot_username,
    );

    for (slot, mut text) in slots.iter_mut() {
        let value = match slot {
            HudSlot::Balance => &projection.balance,
            HudSlot::TotalEarned => &projection.total_earned,
            HudSlot::AdsWatched => &projection.ads_watched,
            HudSlot::Referrals => &projection.referrals,
            HudSlot::QuestCurrent => &projection.quest_current,
            HudSlot::ReferralLink => &projection.referral_link,
        };
        if text.0 != *value {
            text.0 = value.clone();
        }
    }

    for mut node in bars.iter_mut() {
        node.width = Val::Percent(projection.quest_percent);
    }
}

pub fn handle_action_buttons(
    buttons: Query<(&Interaction, &ActionButton), (Changed<Interaction>, With<Button>)>,
    mut requests: MessageWriter<RewardActionRequested>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            debug!("Action button pressed: {}", button.action);
            requests.write(RewardActionRequested {
                action: button.action,
            });
        }
    }
}

pub fn handle_main_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<MainButton>)>,
    mut requests: MessageWriter<HostCloseRequested>,
) {
    if buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        requests.write(HostCloseRequested {
            source: CloseSource::MainButton,
        });
    }
}

pub fn style_action_buttons(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<ActionButton>)>,
) {
    for (interaction, mut background) in buttons.iter_mut() {
        background.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED_COLOR,
            Interaction::Hovered => BUTTON_HOVER_COLOR,
            Interaction::None => BUTTON_COLOR,
        };
    }
}

/// Mirrors the text the host was given for its main button.
pub fn sync_main_button_label(
    host: Res<ActiveHost>,
    mut labels: Query<&mut Text, With<MainButtonLabel>>,
) {
    let wanted = host.host().main_button_text();
    for mut text in labels.iter_mut() {
        if text.0 != wanted {
            text.0 = wanted.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::{amount::Ton, state::UserState, store::MemorySnapshotStore};

    fn app_with_state(state: UserState) -> App {
        let config = RewardConfig::default();
        let mut ledger = RewardLedger::new(
            UserState::new(config.referral.fallback_user_id),
            config.quest_steps,
            Box::new(MemorySnapshotStore::default()),
        );
        ledger.set_state(state);

        let mut app = App::new();
        app.insert_resource(ledger)
            .insert_resource(config)
            .add_message::<RewardActionRequested>()
            .add_message::<HostCloseRequested>()
            .add_systems(
                Update,
                (refresh_hud, handle_action_buttons, handle_main_button),
            );
        app
    }

    #[test]
    fn refresh_writes_every_slot() {
        let mut state = UserState::new(99);
        state.balance = Ton::from_nanotons(2_500_000);
        state.referrals = 4;
        state.quest_progress = 1;
        let mut app = app_with_state(state);

        let balance = app.world_mut().spawn((Text::new(""), HudSlot::Balance)).id();
        let referrals = app.world_mut().spawn((Text::new(""), HudSlot::Referrals)).id();
        let link = app
            .world_mut()
            .spawn((Text::new(""), HudSlot::ReferralLink))
            .id();
        let bar = app
            .world_mut()
            .spawn((Node::default(), QuestProgressBar))
            .id();

        app.update();

        let world = app.world();
        assert_eq!(world.get::<Text>(balance).unwrap().0, "0.003 TON");
        assert_eq!(world.get::<Text>(referrals).unwrap().0, "4");
        assert_eq!(
            world.get::<Text>(link).unwrap().0,
            "https://t.me/YourBot?start=ref_99"
        );
        match world.get::<Node>(bar).unwrap().width {
            Val::Percent(percent) => assert!((percent - 100.0 / 3.0).abs() < 0.01),
            other => panic!("unexpected bar width {:?}", other),
        }
    }

    #[test]
    fn pressed_buttons_emit_requests() {
        let mut app = app_with_state(UserState::new(1));
        app.world_mut().spawn((
            Button,
            Interaction::Pressed,
            ActionButton {
                action: ActionKind::TapAd,
            },
        ));
        app.world_mut().spawn((
            Button,
            Interaction::Hovered,
            ActionButton {
                action: ActionKind::WatchAd,
            },
        ));
        app.world_mut()
            .spawn((Button, Interaction::Pressed, MainButton));

        app.update();

        let requests = app.world().resource::<Messages<RewardActionRequested>>();
        let mut cursor = requests.get_cursor();
        let actions: Vec<ActionKind> = cursor.read(requests).map(|request| request.action).collect();
        assert_eq!(actions, vec![ActionKind::TapAd]);

        let closes = app.world().resource::<Messages<HostCloseRequested>>();
        assert_eq!(closes.len(), 1);
    }
}
