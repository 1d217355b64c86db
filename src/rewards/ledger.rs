//! Owned reward ledger: the single writer of `UserState` and its snapshot.
use std::fmt;

use bevy::prelude::*;
use serde::Serialize;

use super::{
    amount::Ton,
    errors::{ActionRejection, LedgerError},
    snapshot::{self, SnapshotOrigin},
    state::{QuestAdvance, UserState},
    store::SnapshotStore,
};

/// What earned a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditSource {
    WatchAd,
    TapAd,
    VisitSite,
    FollowChannel,
    Referral,
    QuestBonus,
}

impl fmt::Display for CreditSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WatchAd => "watch_ad",
            Self::TapAd => "tap_ad",
            Self::VisitSite => "visit_site",
            Self::FollowChannel => "follow_channel",
            Self::Referral => "referral",
            Self::QuestBonus => "quest_bonus",
        };
        write!(f, "{}", label)
    }
}

/// One balance movement applied by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEntry {
    Credit {
        source: CreditSource,
        amount: Ton,
        balance_after: Ton,
    },
    Withdrawal {
        amount: Ton,
        balance_after: Ton,
    },
}

impl LedgerEntry {
    pub fn amount(&self) -> Ton {
        match self {
            Self::Credit { amount, .. } | Self::Withdrawal { amount, .. } => *amount,
        }
    }
}

/// How startup restoration went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    FirstRun,
    Restored,
    Migrated,
}

/// Owns the user record and persists it after every mutation.
#[derive(Resource)]
pub struct RewardLedger {
    state: UserState,
    defaults: UserState,
    quest_steps: u32,
    store: Box<dyn SnapshotStore>,
    failed_writes: u64,
}

impl RewardLedger {
    pub fn new(defaults: UserState, quest_steps: u32, store: Box<dyn SnapshotStore>) -> Self {
        Self {
            state: defaults.clone(),
            defaults,
            quest_steps: quest_steps.max(1),
            store,
            failed_writes: 0,
        }
    }

    pub fn state(&self) -> &UserState {
        &self.state
    }

    pub fn quest_steps(&self) -> u32 {
        self.quest_steps
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    /// Uses the host-reported identity instead of the configured fallback.
    /// A persisted snapshot still wins over it on load.
    pub fn adopt_host_user(&mut self, user_id: i64) {
        self.defaults.user_id = user_id;
        self.state.user_id = user_id;
    }

    /// Overlays the persisted snapshot on the defaults.
    ///
    /// A snapshot that cannot be decoded is quarantined and the ledger keeps
    /// its defaults; the error is returned for the caller to report.
    pub fn load(&mut self) -> Result<LoadOutcome, LedgerError> {
        let Some(raw) = self.store.read()? else {
            self.state = self.defaults.clone();
            return Ok(LoadOutcome::FirstRun);
        };

        match snapshot::decode(&raw, &self.defaults, self.quest_steps) {
            Ok((state, origin)) => {
                self.state = state;
                match origin {
                    SnapshotOrigin::Current => Ok(LoadOutcome::Restored),
                    SnapshotOrigin::Legacy => {
                        self.save()?;
                        Ok(LoadOutcome::Migrated)
                    }
                }
            }
            Err(err) => {
                self.state = self.defaults.clone();
                if let Err(quarantine_err) = self.store.quarantine() {
                    warn!(
                        target: "rewards",
                        "Could not move rejected snapshot aside: {}",
                        quarantine_err
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Serializes the whole record and overwrites the stored snapshot.
    pub fn save(&mut self) -> Result<(), LedgerError> {
        let encoded = snapshot::encode(&self.state)?;
        self.store.write(&encoded)?;
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.save() {
            self.failed_writes += 1;
            warn!(
                target: "rewards",
                "Failed to persist reward snapshot to {} ({} failed this session): {}",
                self.store.describe(),
                self.failed_writes,
                err
            );
        }
    }

    pub fn credit(&mut self, amount: Ton, source: CreditSource) -> LedgerEntry {
        self.state.credit(amount);
        self.persist();
        LedgerEntry::Credit {
            source,
            amount,
            balance_after: self.state.balance,
        }
    }

    /// Counts an ad-like action and pays for it in one write.
    pub fn credit_ad_view(&mut self, amount: Ton, source: CreditSource) -> LedgerEntry {
        self.state.record_ad_view();
        self.credit(amount, source)
    }

    /// Applies one simulated referral: counts it, moves the quest, and pays out.
    pub fn apply_referral(
        &mut self,
        referral: Ton,
        quest_bonus: Ton,
    ) -> (QuestAdvance, LedgerEntry) {
        let advance = self.state.advance_quest(self.quest_steps);
        let entry = match advance {
            QuestAdvance::Completed => self.credit(quest_bonus, CreditSource::QuestBonus),
            QuestAdvance::Progressed { .. } => self.credit(referral, CreditSource::Referral),
        };
        (advance, entry)
    }

    /// Returns `false` when the wallet was already linked.
    pub fn connect_wallet(&mut self) -> bool {
        if self.state.wallet_connected {
            return false;
        }
        self.state.wallet_connected = true;
        self.persist();
        true
    }

    pub fn check_wallet_connection(&self) -> Result<(), ActionRejection> {
        if self.state.wallet_connected {
            Err(ActionRejection::WalletAlreadyConnected)
        } else {
            Ok(())
        }
    }

    pub fn check_withdrawal(&self, minimum: Ton) -> Result<(), ActionRejection> {
        if !self.state.wallet_connected {
            return Err(ActionRejection::WalletNotConnected);
        }
        if self.state.balance < minimum {
            return Err(ActionRejection::BelowMinimumWithdrawal {
                minimum: minimum.to_compact_string(),
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: UserState) {
        self.state = state;
    }

    /// Sends the whole balance out. Lifetime earnings are left alone.
    pub fn withdraw_all(&mut self) -> LedgerEntry {
        let amount = self.state.take_balance();
        self.persist();
        LedgerEntry::Withdrawal {
            amount,
            balance_after: self.state.balance,
        }
    }
}
