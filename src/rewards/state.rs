//! The user's reward record and its in-place mutations.
use super::amount::Ton;

/// Result of advancing the repeating quest by one referral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestAdvance {
    Progressed { progress: u32 },
    Completed,
}

/// Economic state for the single local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub balance: Ton,
    pub total_earned: Ton,
    pub ads_watched: u64,
    pub referrals: u64,
    pub quest_progress: u32,
    pub wallet_connected: bool,
    pub user_id: i64,
}

impl UserState {
    pub fn new(user_id: i64) -> Self {
        Self {
            balance: Ton::ZERO,
            total_earned: Ton::ZERO,
            ads_watched: 0,
            referrals: 0,
            quest_progress: 0,
            wallet_connected: false,
            user_id,
        }
    }

    /// Adds to both the withdrawable balance and lifetime earnings.
    pub fn credit(&mut self, amount: Ton) {
        self.balance += amount;
        self.total_earned += amount;
    }

    pub fn record_ad_view(&mut self) {
        self.ads_watched = self.ads_watched.saturating_add(1);
    }

    /// Counts a referral and moves the quest forward, wrapping to zero on completion.
    pub fn advance_quest(&mut self, steps: u32) -> QuestAdvance {
        let steps = steps.max(1);
        self.referrals = self.referrals.saturating_add(1);
        self.quest_progress = (self.quest_progress + 1).min(steps);
        if self.quest_progress == steps {
            self.quest_progress = 0;
            QuestAdvance::Completed
        } else {
            QuestAdvance::Progressed {
                progress: self.quest_progress,
            }
        }
    }

    /// Zeroes the balance and returns what was there. Lifetime earnings are untouched.
    pub fn take_balance(&mut self) -> Ton {
        std::mem::take(&mut self.balance)
    }

    pub fn quest_percent(&self, steps: u32) -> f32 {
        let steps = steps.max(1) as f32;
        (self.quest_progress as f32 / steps * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_accumulate_into_balance_and_total() {
        let mut state = UserState::new(1);
        let credits = [500_000_u64, 1_000_000, 2_000_000, 3_000_000];
        for nanotons in credits {
            state.credit(Ton::from_nanotons(nanotons));
        }
        let expected: Ton = credits.into_iter().map(Ton::from_nanotons).sum();
        assert_eq!(state.total_earned, expected);
        assert_eq!(state.balance, expected);

        let withdrawn = state.take_balance();
        assert_eq!(withdrawn, expected);
        assert_eq!(state.balance, Ton::ZERO);
        assert_eq!(state.total_earned, expected);
    }

    #[test]
    fn quest_wraps_on_third_step() {
        let mut state = UserState::new(1);
        assert_eq!(
            state.advance_quest(3),
            QuestAdvance::Progressed { progress: 1 }
        );
        assert_eq!(
            state.advance_quest(3),
            QuestAdvance::Progressed { progress: 2 }
        );
        assert_eq!(state.advance_quest(3), QuestAdvance::Completed);
        assert_eq!(state.quest_progress, 0);
        assert_eq!(state.referrals, 3);
    }

    #[test]
    fn quest_stuck_at_cap_completes_on_next_step() {
        let mut state = UserState::new(1);
        state.quest_progress = 3;
        assert_eq!(state.advance_quest(3), QuestAdvance::Completed);
        assert_eq!(state.quest_progress, 0);
    }

    #[test]
    fn quest_percent_is_capped() {
        let mut state = UserState::new(1);
        state.quest_progress = 2;
        assert!((state.quest_percent(3) - 66.666_67).abs() < 0.01);
        state.quest_progress = 3;
        assert_eq!(state.quest_percent(3), 100.0);
    }
}
