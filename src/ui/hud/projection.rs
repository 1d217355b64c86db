// src/ui/hud/projection.rs
//
// Pure read of the ledger into the strings the HUD displays.

use crate::rewards::{referral::referral_link, state::UserState};

/// Display values for every HUD slot, derived from one `UserState`.
#[derive(Debug, Clone, PartialEq)]
pub struct HudProjection {
    pub balance: String,
    pub total_earned: String,
    pub ads_watched: String,
    pub referrals: String,
    pub quest_current: String,
    pub quest_steps: String,
    /// Width of the quest bar, 0..=100.
    pub quest_percent: f32,
    pub referral_link: String,
}

impl HudProjection {
    pub fn from_state(state: &UserState, quest_steps: u32, bot_username: &str) -> Self {
        Self {
            balance: format!("{} TON", state.balance),
            total_earned: state.total_earned.to_string(),
            ads_watched: state.ads_watched.to_string(),
            referrals: state.referrals.to_string(),
            quest_current: state.quest_progress.to_string(),
            quest_steps: quest_steps.to_string(),
            quest_percent: state.quest_percent(quest_steps),
            referral_link: referral_link(bot_username, state.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::amount::Ton;

    #[test]
    fn formats_amounts_to_three_decimals() {
        let mut state = UserState::new(123_456);
        state.balance = Ton::from_nanotons(1_000_000);
        state.total_earned = Ton::from_nanotons(21_500_000);
        state.ads_watched = 7;

        let projection = HudProjection::from_state(&state, 3, "YourBot");

        assert_eq!(projection.balance, "0.001 TON");
        assert_eq!(projection.total_earned, "0.022");
        assert_eq!(projection.ads_watched, "7");
        assert_eq!(
            projection.referral_link,
            "https://t.me/YourBot?start=ref_123456"
        );
    }

    #[test]
    fn quest_bar_tracks_progress() {
        let mut state = UserState::new(1);
        state.quest_progress = 2;
        let projection = HudProjection::from_state(&state, 3, "YourBot");

        assert_eq!(projection.quest_current, "2");
        assert!((projection.quest_percent - 200.0 / 3.0).abs() < 0.01);

        state.quest_progress = 3;
        let full = HudProjection::from_state(&state, 3, "YourBot");
        assert_eq!(full.quest_percent, 100.0);
    }
}
