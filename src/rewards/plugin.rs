//! Rewards plugin wiring the ledger, backend, feed and history resources.
use bevy::prelude::*;

use crate::core::SimulationClock;

use super::{
    actions::{ActiveActionBackend, SimulatedActionBackend},
    config::RewardConfig,
    events::{LedgerEntryRecorded, NotificationRequested, RewardActionRequested},
    history::{flush_reward_history_log, record_reward_history, RewardHistory, RewardHistoryLog},
    ledger::RewardLedger,
    simulated::SimulatedEventFeed,
    state::UserState,
    store::FileSnapshotStore,
    systems::{
        complete_pending_actions, handle_action_requests, log_rewards_startup, restore_ledger,
        roll_simulated_events, show_welcome_notice, WelcomeNotice,
    },
};

/// Ordering anchor for systems that read ledger state after this frame's writes.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RewardSystems;

/// Loads `config/rewards.toml` during `build` unless a config was supplied.
#[derive(Default)]
pub struct RewardsPlugin {
    config: Option<RewardConfig>,
}

impl RewardsPlugin {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_config(config: RewardConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Plugin for RewardsPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(RewardConfig::load_or_default);

        if let Some(mut clock) = app.world_mut().get_resource_mut::<SimulationClock>() {
            clock.set_time_scale(config.time_scale);
        }

        let store = FileSnapshotStore::new(config.storage.snapshot_path.clone());
        let ledger = RewardLedger::new(
            UserState::new(config.referral.fallback_user_id),
            config.quest_steps,
            Box::new(store),
        );

        app.insert_resource(ledger)
            .insert_resource(ActiveActionBackend::new(Box::new(
                SimulatedActionBackend::new(config.delays.clone()),
            )))
            .insert_resource(SimulatedEventFeed::new(&config.feed))
            .insert_resource(RewardHistory::default())
            .insert_resource(RewardHistoryLog::new(config.storage.history_path.clone()))
            .init_resource::<WelcomeNotice>()
            .insert_resource(config)
            .add_message::<RewardActionRequested>()
            .add_message::<NotificationRequested>()
            .add_message::<LedgerEntryRecorded>()
            .add_systems(Startup, (restore_ledger, log_rewards_startup).chain())
            .add_systems(
                Update,
                (
                    handle_action_requests,
                    complete_pending_actions,
                    roll_simulated_events,
                    show_welcome_notice,
                    record_reward_history,
                    flush_reward_history_log,
                )
                    .chain()
                    .in_set(RewardSystems),
            );
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf, time::SystemTime};

    use super::*;
    use crate::{
        host::{ActiveClipboard, ActiveHost, RecordingHost, SharedClipboard},
        rewards::{actions::ActionKind, amount::Ton, history::RewardHistory},
    };

    fn temp_dir(label: &str) -> PathBuf {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("tontap_{}_{}", label, unique_suffix))
    }

    #[test]
    fn tap_is_persisted_and_logged() {
        let dir = temp_dir("plugin");
        let mut config = RewardConfig::default();
        config.feed.enabled = false;
        config.storage.snapshot_path = dir.join("tontap_data.json");
        config.storage.history_path = dir.join("reward_history.jsonl");

        let mut app = App::new();
        app.insert_resource(SimulationClock::default())
            .insert_resource(ActiveHost::new(Box::new(RecordingHost::default())))
            .insert_resource(ActiveClipboard::new(Box::new(SharedClipboard::default())))
            .add_plugins(RewardsPlugin::with_config(config.clone()));
        app.update();

        app.world_mut().write_message(RewardActionRequested {
            action: ActionKind::TapAd,
        });
        app.update();

        let ledger = app.world().resource::<RewardLedger>();
        assert_eq!(ledger.state().balance, Ton::from_nanotons(500_000));
        assert_eq!(app.world().resource::<RewardHistory>().len(), 1);

        let snapshot = fs::read_to_string(&config.storage.snapshot_path).unwrap();
        assert!(snapshot.contains("\"balance_nanotons\": 500000"));
        let history = fs::read_to_string(&config.storage.history_path).unwrap();
        assert_eq!(history.lines().count(), 1);
        assert!(history.contains("\"source\":\"tap_ad\""));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn configured_time_scale_reaches_the_session_clock() {
        let dir = temp_dir("time_scale");
        let mut config = RewardConfig::default();
        config.feed.enabled = false;
        config.time_scale = 4.0;
        config.storage.snapshot_path = dir.join("tontap_data.json");
        config.storage.history_path = dir.join("reward_history.jsonl");

        let mut app = App::new();
        app.insert_resource(SimulationClock::default())
            .insert_resource(ActiveHost::new(Box::new(RecordingHost::default())))
            .insert_resource(ActiveClipboard::new(Box::new(SharedClipboard::default())))
            .add_plugins(RewardsPlugin::with_config(config));

        assert_eq!(app.world().resource::<SimulationClock>().time_scale(), 4.0);

        let _ = fs::remove_dir_all(&dir);
    }
}
