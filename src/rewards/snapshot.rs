//! Versioned snapshot schema for the persisted user record.
//!
//! Version 1 stores amounts as integer nanotons. Snapshots without a `version`
//! field are the legacy browser shape (camelCase keys, float TON amounts) and
//! are migrated by overlaying whatever fields they carry on the defaults.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{amount::Ton, errors::SnapshotError, state::UserState};

pub const SNAPSHOT_VERSION: u64 = 1;

/// Where a decoded snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    Current,
    Legacy,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotV1 {
    version: u64,
    balance_nanotons: u64,
    total_earned_nanotons: u64,
    ads_watched: u64,
    referrals: u64,
    quest_progress: u32,
    wallet_connected: bool,
    user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySnapshot {
    balance: Option<f64>,
    total_earned: Option<f64>,
    ads_watched: Option<f64>,
    referrals: Option<f64>,
    quest_progress: Option<f64>,
    wallet_connected: Option<bool>,
    user_id: Option<f64>,
}

pub fn encode(state: &UserState) -> Result<String, SnapshotError> {
    let snapshot = SnapshotV1 {
        version: SNAPSHOT_VERSION,
        balance_nanotons: state.balance.nanotons(),
        total_earned_nanotons: state.total_earned.nanotons(),
        ads_watched: state.ads_watched,
        referrals: state.referrals,
        quest_progress: state.quest_progress,
        wallet_connected: state.wallet_connected,
        user_id: state.user_id,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Decodes and validates a stored snapshot against `defaults`.
pub fn decode(
    raw: &str,
    defaults: &UserState,
    quest_steps: u32,
) -> Result<(UserState, SnapshotOrigin), SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;
    let version = match &value {
        Value::Object(fields) => fields.get("version").cloned(),
        _ => return Err(SnapshotError::malformed("snapshot is not a JSON object")),
    };

    let Some(version) = version else {
        let legacy: LegacySnapshot = serde_json::from_value(value)?;
        let state = migrate_legacy(legacy, defaults)?;
        return validate((state, SnapshotOrigin::Legacy), quest_steps);
    };

    let state = match version.as_u64() {
        Some(SNAPSHOT_VERSION) => {
            let snapshot: SnapshotV1 = serde_json::from_value(value)?;
            UserState {
                balance: Ton::from_nanotons(snapshot.balance_nanotons),
                total_earned: Ton::from_nanotons(snapshot.total_earned_nanotons),
                ads_watched: snapshot.ads_watched,
                referrals: snapshot.referrals,
                quest_progress: snapshot.quest_progress,
                wallet_connected: snapshot.wallet_connected,
                user_id: snapshot.user_id,
            }
        }
        Some(found) => return Err(SnapshotError::UnsupportedVersion { found }),
        None => {
            return Err(SnapshotError::invalid_field(
                "version",
                format!("expected a positive integer, found {}", version),
            ))
        }
    };

    validate((state, SnapshotOrigin::Current), quest_steps)
}

fn validate(
    decoded: (UserState, SnapshotOrigin),
    quest_steps: u32,
) -> Result<(UserState, SnapshotOrigin), SnapshotError> {
    let (state, _) = &decoded;
    if state.quest_progress > quest_steps {
        return Err(SnapshotError::invalid_field(
            "quest_progress",
            format!("{} exceeds quest length {}", state.quest_progress, quest_steps),
        ));
    }
    Ok(decoded)
}

fn migrate_legacy(
    legacy: LegacySnapshot,
    defaults: &UserState,
) -> Result<UserState, SnapshotError> {
    let mut state = defaults.clone();
    if let Some(balance) = legacy.balance {
        state.balance = legacy_amount("balance", balance)?;
    }
    if let Some(total) = legacy.total_earned {
        state.total_earned = legacy_amount("totalEarned", total)?;
    }
    if let Some(ads) = legacy.ads_watched {
        state.ads_watched = legacy_counter("adsWatched", ads)?;
    }
    if let Some(referrals) = legacy.referrals {
        state.referrals = legacy_counter("referrals", referrals)?;
    }
    if let Some(progress) = legacy.quest_progress {
        let progress = legacy_counter("questProgress", progress)?;
        state.quest_progress = u32::try_from(progress)
            .map_err(|_| SnapshotError::invalid_field("questProgress", "out of range"))?;
    }
    if let Some(connected) = legacy.wallet_connected {
        state.wallet_connected = connected;
    }
    if let Some(user_id) = legacy.user_id {
        if !user_id.is_finite() || user_id.fract() != 0.0 {
            return Err(SnapshotError::invalid_field(
                "userId",
                format!("expected an integer, found {}", user_id),
            ));
        }
        state.user_id = user_id as i64;
    }
    Ok(state)
}

fn legacy_amount(field: &'static str, value: f64) -> Result<Ton, SnapshotError> {
    Ton::from_ton_f64(value).ok_or_else(|| {
        SnapshotError::invalid_field(
            field,
            format!("expected a non-negative amount, found {}", value),
        )
    })
}

fn legacy_counter(field: &'static str, value: f64) -> Result<u64, SnapshotError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(SnapshotError::invalid_field(
            field,
            format!("expected a non-negative integer, found {}", value),
        ));
    }
    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> UserState {
        UserState::new(123_456)
    }

    #[test]
    fn current_snapshot_survives_encode_decode() {
        let mut state = defaults();
        state.credit(Ton::from_nanotons(12_500_000));
        state.ads_watched = 4;
        state.referrals = 2;
        state.quest_progress = 2;
        state.wallet_connected = true;

        let raw = encode(&state).unwrap();
        let (decoded, origin) = decode(&raw, &defaults(), 3).unwrap();
        assert_eq!(decoded, state);
        assert_eq!(origin, SnapshotOrigin::Current);
    }

    #[test]
    fn legacy_snapshot_overlays_defaults() {
        let raw = r#"{"balance":0.0015,"adsWatched":3,"walletConnected":true,"theme":"dark"}"#;
        let (state, origin) = decode(raw, &defaults(), 3).unwrap();

        assert_eq!(origin, SnapshotOrigin::Legacy);
        assert_eq!(state.balance, Ton::from_nanotons(1_500_000));
        assert_eq!(state.total_earned, Ton::ZERO);
        assert_eq!(state.ads_watched, 3);
        assert!(state.wallet_connected);
        assert_eq!(state.user_id, 123_456);
    }

    #[test]
    fn legacy_user_id_overrides_default() {
        let raw = r#"{"userId": 987654321, "questProgress": 1}"#;
        let (state, _) = decode(raw, &defaults(), 3).unwrap();
        assert_eq!(state.user_id, 987_654_321);
        assert_eq!(state.quest_progress, 1);
    }

    #[test]
    fn rejects_unknown_versions() {
        let err = decode(r#"{"version": 7}"#, &defaults(), 3).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn rejects_garbage_and_bad_fields() {
        assert!(matches!(
            decode("not json", &defaults(), 3),
            Err(SnapshotError::Malformed { .. })
        ));
        assert!(matches!(
            decode("[1,2,3]", &defaults(), 3),
            Err(SnapshotError::Malformed { .. })
        ));
        assert!(matches!(
            decode(r#"{"balance": -1}"#, &defaults(), 3),
            Err(SnapshotError::InvalidField { field: "balance", .. })
        ));
        assert!(matches!(
            decode(r#"{"adsWatched": 1.5}"#, &defaults(), 3),
            Err(SnapshotError::InvalidField { field: "adsWatched", .. })
        ));
        assert!(matches!(
            decode(r#"{"balance": "lots"}"#, &defaults(), 3),
            Err(SnapshotError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_quest_progress_beyond_quest_length() {
        let mut state = defaults();
        state.quest_progress = 9;
        let raw = encode(&state).unwrap();
        assert!(matches!(
            decode(&raw, &defaults(), 3),
            Err(SnapshotError::InvalidField {
                field: "quest_progress",
                ..
            })
        ));
    }

    #[test]
    fn current_snapshot_rejects_unknown_fields() {
        let raw = r#"{"version":1,"balance_nanotons":0,"total_earned_nanotons":0,"ads_watched":0,"referrals":0,"quest_progress":0,"wallet_connected":false,"user_id":1,"extra":true}"#;
        assert!(matches!(
            decode(raw, &defaults(), 3),
            Err(SnapshotError::Malformed { .. })
        ));
    }
}
