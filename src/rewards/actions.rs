//! Earning actions and the backend that carries out their delayed half.
use std::{fmt, time::Duration};

use bevy::prelude::*;

use super::{config::ActionDelays, errors::ActionRejection};

/// Every user-triggered action the ledger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    WatchAd,
    TapAd,
    VisitSite,
    FollowChannel,
    ShareReferral,
    CopyReferral,
    ConnectWallet,
    Withdraw,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::WatchAd,
        ActionKind::TapAd,
        ActionKind::VisitSite,
        ActionKind::FollowChannel,
        ActionKind::ShareReferral,
        ActionKind::CopyReferral,
        ActionKind::ConnectWallet,
        ActionKind::Withdraw,
    ];

    /// Human-readable name used in notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::WatchAd => "Advertisement",
            Self::TapAd => "Ad tap",
            Self::VisitSite => "Site visit",
            Self::FollowChannel => "Subscription check",
            Self::ShareReferral => "Sharing",
            Self::CopyReferral => "Copy",
            Self::ConnectWallet => "Wallet connection",
            Self::Withdraw => "Withdrawal",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            Self::WatchAd => "Watch Ad",
            Self::TapAd => "Tap Ad",
            Self::VisitSite => "Visit Site",
            Self::FollowChannel => "Follow Channel",
            Self::ShareReferral => "Share Link",
            Self::CopyReferral => "Copy Link",
            Self::ConnectWallet => "Connect Wallet",
            Self::Withdraw => "Withdraw",
        }
    }

    /// Shown the moment a delayed action is accepted.
    pub fn pending_notice(self) -> Option<&'static str> {
        match self {
            Self::WatchAd => Some("Opening advertisement..."),
            Self::VisitSite => Some("Redirecting to website..."),
            Self::FollowChannel => Some("Checking subscription..."),
            Self::ConnectWallet => Some("Connecting wallet..."),
            Self::Withdraw => Some("Processing withdrawal..."),
            Self::TapAd | Self::ShareReferral | Self::CopyReferral => None,
        }
    }

    /// Latency of the delayed half, or `None` when the action completes immediately.
    pub fn delay(self, delays: &ActionDelays) -> Option<Duration> {
        match self {
            Self::WatchAd => Some(delays.watch_ad),
            Self::VisitSite => Some(delays.visit_site),
            Self::FollowChannel => Some(delays.follow_channel),
            Self::ConnectWallet => Some(delays.connect_wallet),
            Self::Withdraw => Some(delays.withdraw),
            Self::TapAd | Self::ShareReferral | Self::CopyReferral => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WatchAd => "watch_ad",
            Self::TapAd => "tap_ad",
            Self::VisitSite => "visit_site",
            Self::FollowChannel => "follow_channel",
            Self::ShareReferral => "share_referral",
            Self::CopyReferral => "copy_referral",
            Self::ConnectWallet => "connect_wallet",
            Self::Withdraw => "withdraw",
        };
        write!(f, "{}", label)
    }
}

/// Handle for one submitted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionTicket(u64);

impl ActionTicket {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reported by [`ActionBackend::poll`] once an action's delayed half is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCompletion {
    pub ticket: ActionTicket,
    pub action: ActionKind,
}

/// Contract for whatever carries out the slow part of an action.
///
/// Callers only submit, poll and cancel, so a backend doing real network work
/// can replace the fixed-delay simulation without touching the ledger systems.
pub trait ActionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Starts `action`. At most one instance per kind may be in flight.
    fn submit(&mut self, action: ActionKind) -> Result<ActionTicket, ActionRejection>;

    fn is_in_flight(&self, action: ActionKind) -> bool;

    fn cancel(&mut self, action: ActionKind) -> Option<ActionTicket>;

    /// Cancels everything in flight, returning how many actions were dropped.
    fn cancel_all(&mut self) -> usize;

    /// Advances the backend by `delta` and drains finished actions in the order they
    /// came due, ties going to the earlier submission.
    fn poll(&mut self, delta: Duration) -> Vec<ActionCompletion>;
}

#[derive(Debug, Clone, Copy)]
struct PendingAction {
    ticket: ActionTicket,
    action: ActionKind,
    due: Duration,
}

/// Completes each action after the fixed delay configured for its kind.
#[derive(Debug)]
pub struct SimulatedActionBackend {
    delays: ActionDelays,
    pending: Vec<PendingAction>,
    next_ticket: u64,
    now: Duration,
}

impl SimulatedActionBackend {
    pub fn new(delays: ActionDelays) -> Self {
        Self {
            delays,
            pending: Vec::new(),
            next_ticket: 1,
            now: Duration::ZERO,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn in_flight_count(&self) -> usize {
        self.pending.len()
    }
}

impl ActionBackend for SimulatedActionBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn submit(&mut self, action: ActionKind) -> Result<ActionTicket, ActionRejection> {
        if self.is_in_flight(action) {
            return Err(ActionRejection::AlreadyInFlight { action });
        }

        let ticket = ActionTicket::new(self.next_ticket);
        self.next_ticket += 1;
        let delay = action.delay(&self.delays).unwrap_or(Duration::ZERO);
        self.pending.push(PendingAction {
            ticket,
            action,
            due: self.now + delay,
        });
        Ok(ticket)
    }

    fn is_in_flight(&self, action: ActionKind) -> bool {
        self.pending.iter().any(|entry| entry.action == action)
    }

    fn cancel(&mut self, action: ActionKind) -> Option<ActionTicket> {
        let index = self
            .pending
            .iter()
            .position(|entry| entry.action == action)?;
        Some(self.pending.remove(index).ticket)
    }

    fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    fn poll(&mut self, delta: Duration) -> Vec<ActionCompletion> {
        self.now += delta;
        let now = self.now;
        let mut finished: Vec<PendingAction> = Vec::new();
        self.pending.retain(|entry| {
            if entry.due <= now {
                finished.push(*entry);
                false
            } else {
                true
            }
        });
        finished.sort_by_key(|entry| (entry.due, entry.ticket.0));
        finished
            .into_iter()
            .map(|entry| ActionCompletion {
                ticket: entry.ticket,
                action: entry.action,
            })
            .collect()
    }
}

/// Resource wrapping the backend the reward systems talk to.
#[derive(Resource)]
pub struct ActiveActionBackend(Box<dyn ActionBackend>);

impl ActiveActionBackend {
    pub fn new(backend: Box<dyn ActionBackend>) -> Self {
        Self(backend)
    }

    pub fn backend(&self) -> &dyn ActionBackend {
        self.0.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn ActionBackend {
        self.0.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::config::RewardConfig;

    fn backend() -> SimulatedActionBackend {
        SimulatedActionBackend::new(RewardConfig::default().delays)
    }

    #[test]
    fn completes_after_configured_delay() {
        let mut backend = backend();
        let ticket = backend.submit(ActionKind::WatchAd).unwrap();

        assert!(backend.poll(Duration::from_millis(1999)).is_empty());
        let done = backend.poll(Duration::from_millis(1));
        assert_eq!(
            done,
            vec![ActionCompletion {
                ticket,
                action: ActionKind::WatchAd
            }]
        );
        assert!(!backend.is_in_flight(ActionKind::WatchAd));
    }

    #[test]
    fn rejects_second_submission_of_same_kind() {
        let mut backend = backend();
        backend.submit(ActionKind::Withdraw).unwrap();
        assert_eq!(
            backend.submit(ActionKind::Withdraw),
            Err(ActionRejection::AlreadyInFlight {
                action: ActionKind::Withdraw
            })
        );
        // Other kinds are independent.
        assert!(backend.submit(ActionKind::VisitSite).is_ok());
        assert_eq!(backend.in_flight_count(), 2);
    }

    #[test]
    fn completions_follow_due_time_within_one_poll() {
        let mut backend = backend();
        backend.submit(ActionKind::Withdraw).unwrap();
        backend.submit(ActionKind::VisitSite).unwrap();
        backend.submit(ActionKind::WatchAd).unwrap();

        // One long frame covers all three delays (3 s, 1 s, 2 s).
        let done: Vec<_> = backend
            .poll(Duration::from_secs(5))
            .into_iter()
            .map(|completion| completion.action)
            .collect();
        assert_eq!(
            done,
            vec![ActionKind::VisitSite, ActionKind::WatchAd, ActionKind::Withdraw]
        );
    }

    #[test]
    fn equal_due_times_keep_submission_order() {
        let mut backend = backend();
        // Both connect_wallet and watch_ad default to 2 s.
        let wallet = backend.submit(ActionKind::ConnectWallet).unwrap();
        let ad = backend.submit(ActionKind::WatchAd).unwrap();

        let done: Vec<_> = backend
            .poll(Duration::from_secs(2))
            .into_iter()
            .map(|completion| completion.ticket)
            .collect();
        assert_eq!(done, vec![wallet, ad]);
    }

    #[test]
    fn later_submission_is_timed_from_its_own_start() {
        let mut backend = backend();
        backend.poll(Duration::from_secs(10));
        backend.submit(ActionKind::VisitSite).unwrap();

        assert!(backend.poll(Duration::from_millis(999)).is_empty());
        assert_eq!(backend.poll(Duration::from_millis(1)).len(), 1);
    }

    #[test]
    fn cancelled_actions_never_complete() {
        let mut backend = backend();
        let ticket = backend.submit(ActionKind::ConnectWallet).unwrap();
        backend.submit(ActionKind::WatchAd).unwrap();

        assert_eq!(backend.cancel(ActionKind::ConnectWallet), Some(ticket));
        assert_eq!(backend.cancel(ActionKind::ConnectWallet), None);
        assert_eq!(backend.cancel_all(), 1);
        assert!(backend.poll(Duration::from_secs(10)).is_empty());
    }
}
