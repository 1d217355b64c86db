use std::{fs, path::Path, path::PathBuf, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use super::amount::Ton;

const CONFIG_PATH: &str = "config/rewards.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawRewardConfig {
    #[serde(default)]
    amounts: RawAmounts,
    #[serde(default)]
    delays: RawDelays,
    #[serde(default)]
    feed: RawFeed,
    #[serde(default)]
    quest: RawQuest,
    #[serde(default)]
    withdrawal: RawWithdrawal,
    #[serde(default)]
    notifications: RawNotifications,
    #[serde(default)]
    referral: RawReferral,
    #[serde(default)]
    storage: RawStorage,
    #[serde(default)]
    session: RawSession,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawAmounts {
    watch_ad: f64,
    tap_ad: f64,
    visit_site: f64,
    follow_channel: f64,
    referral: f64,
    quest_bonus: f64,
}

impl Default for RawAmounts {
    fn default() -> Self {
        Self {
            watch_ad: 0.001,
            tap_ad: 0.0005,
            visit_site: 0.002,
            follow_channel: 0.003,
            referral: 0.005,
            quest_bonus: 0.01,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDelays {
    watch_ad_seconds: f32,
    visit_site_seconds: f32,
    follow_channel_seconds: f32,
    connect_wallet_seconds: f32,
    withdraw_seconds: f32,
    welcome_seconds: f32,
}

impl Default for RawDelays {
    fn default() -> Self {
        Self {
            watch_ad_seconds: 2.0,
            visit_site_seconds: 1.0,
            follow_channel_seconds: 1.5,
            connect_wallet_seconds: 2.0,
            withdraw_seconds: 3.0,
            welcome_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawFeed {
    enabled: bool,
    interval_seconds: f32,
    probability: f64,
    seed: Option<u64>,
}

impl Default for RawFeed {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 10.0,
            probability: 0.1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawQuest {
    steps: u32,
}

impl Default for RawQuest {
    fn default() -> Self {
        Self { steps: 3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawWithdrawal {
    minimum: f64,
}

impl Default for RawWithdrawal {
    fn default() -> Self {
        Self { minimum: 0.01 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawNotifications {
    visible_seconds: f32,
}

impl Default for RawNotifications {
    fn default() -> Self {
        Self {
            visible_seconds: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawReferral {
    bot_username: String,
    fallback_user_id: i64,
}

impl Default for RawReferral {
    fn default() -> Self {
        Self {
            bot_username: "YourBot".to_string(),
            fallback_user_id: 123_456,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawStorage {
    snapshot_path: String,
    history_path: String,
}

impl Default for RawStorage {
    fn default() -> Self {
        Self {
            snapshot_path: "data/tontap_data.json".to_string(),
            history_path: "logs/reward_history.jsonl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSession {
    time_scale: f32,
}

impl Default for RawSession {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

/// Runtime configuration derived from `config/rewards.toml`.
#[derive(Resource, Debug, Clone)]
pub struct RewardConfig {
    pub amounts: RewardAmounts,
    pub delays: ActionDelays,
    pub feed: FeedConfig,
    pub quest_steps: u32,
    pub minimum_withdrawal: Ton,
    pub notification_visible: Duration,
    pub referral: ReferralConfig,
    pub storage: StorageConfig,
    pub time_scale: f32,
}

/// Credit paid by each earning source.
#[derive(Debug, Clone)]
pub struct RewardAmounts {
    pub watch_ad: Ton,
    pub tap_ad: Ton,
    pub visit_site: Ton,
    pub follow_channel: Ton,
    pub referral: Ton,
    pub quest_bonus: Ton,
}

/// Simulated latency of each delayed action.
#[derive(Debug, Clone)]
pub struct ActionDelays {
    pub watch_ad: Duration,
    pub visit_site: Duration,
    pub follow_channel: Duration,
    pub connect_wallet: Duration,
    pub withdraw: Duration,
    pub welcome: Duration,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub enabled: bool,
    pub interval: Duration,
    pub probability: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ReferralConfig {
    pub bot_username: String,
    pub fallback_user_id: i64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub snapshot_path: PathBuf,
    pub history_path: PathBuf,
}

impl RewardConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawRewardConfig::default().into()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawRewardConfig::default().into()
            }
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawRewardConfig>(raw).map(Into::into)
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        RawRewardConfig::default().into()
    }
}

impl From<RawRewardConfig> for RewardConfig {
    fn from(value: RawRewardConfig) -> Self {
        let fallback = RawAmounts::default();
        let amounts = RewardAmounts {
            watch_ad: amount_or(value.amounts.watch_ad, fallback.watch_ad),
            tap_ad: amount_or(value.amounts.tap_ad, fallback.tap_ad),
            visit_site: amount_or(value.amounts.visit_site, fallback.visit_site),
            follow_channel: amount_or(value.amounts.follow_channel, fallback.follow_channel),
            referral: amount_or(value.amounts.referral, fallback.referral),
            quest_bonus: amount_or(value.amounts.quest_bonus, fallback.quest_bonus),
        };

        let raw = RawDelays::default();
        let delays = ActionDelays {
            watch_ad: seconds(
                "delays.watch_ad_seconds",
                value.delays.watch_ad_seconds,
                raw.watch_ad_seconds,
            ),
            visit_site: seconds(
                "delays.visit_site_seconds",
                value.delays.visit_site_seconds,
                raw.visit_site_seconds,
            ),
            follow_channel: seconds(
                "delays.follow_channel_seconds",
                value.delays.follow_channel_seconds,
                raw.follow_channel_seconds,
            ),
            connect_wallet: seconds(
                "delays.connect_wallet_seconds",
                value.delays.connect_wallet_seconds,
                raw.connect_wallet_seconds,
            ),
            withdraw: seconds(
                "delays.withdraw_seconds",
                value.delays.withdraw_seconds,
                raw.withdraw_seconds,
            ),
            welcome: seconds(
                "delays.welcome_seconds",
                value.delays.welcome_seconds,
                raw.welcome_seconds,
            ),
        };

        let feed = FeedConfig {
            enabled: value.feed.enabled,
            interval: seconds(
                "feed.interval_seconds",
                value.feed.interval_seconds.max(0.1),
                RawFeed::default().interval_seconds,
            ),
            probability: if value.feed.probability.is_finite() {
                value.feed.probability.clamp(0.0, 1.0)
            } else {
                RawFeed::default().probability
            },
            seed: value.feed.seed,
        };

        let bot_username = value.referral.bot_username.trim().trim_start_matches('@');
        let referral = ReferralConfig {
            bot_username: if bot_username.is_empty() {
                RawReferral::default().bot_username
            } else {
                bot_username.to_string()
            },
            fallback_user_id: value.referral.fallback_user_id,
        };

        Self {
            amounts,
            delays,
            feed,
            quest_steps: value.quest.steps.max(1),
            minimum_withdrawal: amount_or(
                value.withdrawal.minimum,
                RawWithdrawal::default().minimum,
            ),
            notification_visible: seconds(
                "notifications.visible_seconds",
                value.notifications.visible_seconds.max(0.1),
                RawNotifications::default().visible_seconds,
            ),
            referral,
            storage: StorageConfig {
                snapshot_path: PathBuf::from(value.storage.snapshot_path),
                history_path: PathBuf::from(value.storage.history_path),
            },
            time_scale: value.session.time_scale,
        }
    }
}

fn amount_or(value: f64, fallback: f64) -> Ton {
    Ton::from_ton_f64(value)
        .or_else(|| Ton::from_ton_f64(fallback))
        .unwrap_or(Ton::ZERO)
}

/// Negative values clamp to zero; values a `Duration` cannot hold use `fallback`.
fn seconds(field: &str, value: f32, fallback: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or_else(|err| {
        warn!(
            "Config value {} = {} is out of range ({}). Using {}s.",
            field, value, err, fallback
        );
        Duration::from_secs_f32(fallback)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_falls_back_to_defaults() {
        let config = RewardConfig::default();
        assert_eq!(config.amounts.tap_ad, Ton::from_nanotons(500_000));
        assert_eq!(config.amounts.quest_bonus, Ton::from_nanotons(10_000_000));
        assert_eq!(config.minimum_withdrawal, Ton::from_nanotons(10_000_000));
        assert_eq!(config.delays.withdraw, Duration::from_secs(3));
        assert_eq!(config.delays.follow_channel, Duration::from_millis(1500));
        assert_eq!(config.quest_steps, 3);
        assert_eq!(config.referral.fallback_user_id, 123_456);
        assert!(config.feed.enabled);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = RewardConfig::from_toml_str(
            r#"
            [amounts]
            tap_ad = 0.25

            [feed]
            probability = 4.0
            seed = 7

            [referral]
            bot_username = "@TonTapBot"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.amounts.tap_ad, Ton::from_ton_f64(0.25).unwrap());
        assert_eq!(config.amounts.watch_ad, Ton::from_ton_f64(0.001).unwrap());
        assert_eq!(config.feed.probability, 1.0);
        assert_eq!(config.feed.seed, Some(7));
        assert_eq!(config.referral.bot_username, "TonTapBot");
    }

    #[test]
    fn negative_amounts_use_fallback() {
        let config = RewardConfig::from_toml_str("[amounts]\nreferral = -1.0\n").unwrap();
        assert_eq!(config.amounts.referral, Ton::from_nanotons(5_000_000));
    }

    #[test]
    fn unrepresentable_delays_use_defaults() {
        let config = RewardConfig::from_toml_str(
            "[delays]\nwithdraw_seconds = 1e30\nwatch_ad_seconds = inf\nvisit_site_seconds = -4.0\n\n[feed]\ninterval_seconds = 1e30\n",
        )
        .expect("config should parse");

        assert_eq!(config.delays.withdraw, Duration::from_secs(3));
        assert_eq!(config.delays.watch_ad, Duration::from_secs(2));
        assert_eq!(config.delays.visit_site, Duration::ZERO);
        assert_eq!(config.feed.interval, Duration::from_secs(10));
    }
}
