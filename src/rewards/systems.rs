//! Systems turning button presses, backend completions and feed rolls into ledger writes.
use std::time::Duration;

use bevy::{ecs::system::SystemParam, prelude::*};

use crate::{
    core::SimulationClock,
    host::{ActiveClipboard, ActiveHost},
};

use super::{
    actions::{ActionKind, ActiveActionBackend},
    config::RewardConfig,
    errors::ActionRejection,
    events::{LedgerEntryRecorded, NotificationRequested, RewardActionRequested},
    ledger::{CreditSource, LedgerEntry, LoadOutcome, RewardLedger},
    referral::{referral_link, share_message, share_url},
    simulated::SimulatedEventFeed,
    state::QuestAdvance,
};

const WELCOME_TEXT: &str = "Welcome to TONTap! Start earning right now! 🚀";

/// One-shot greeting for users that have never earned anything.
#[derive(Resource, Debug, Default)]
pub struct WelcomeNotice {
    timer: Option<Timer>,
}

impl WelcomeNotice {
    pub fn schedule(&mut self, delay: Duration) {
        self.timer = Some(Timer::new(delay, TimerMode::Once));
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if timer.tick(delta).is_finished() {
            self.timer = None;
            return true;
        }
        false
    }
}

#[derive(SystemParam)]
pub struct RewardOutputs<'w> {
    notifications: MessageWriter<'w, NotificationRequested>,
    entries: MessageWriter<'w, LedgerEntryRecorded>,
}

impl RewardOutputs<'_> {
    fn notify(&mut self, text: impl Into<String>) {
        self.notifications.write(NotificationRequested::new(text));
    }

    /// Publishes a ledger movement and the matching notice.
    fn record(&mut self, entry: LedgerEntry) {
        match entry {
            LedgerEntry::Credit { amount, .. } => self.notify(format!("+{} TON earned!", amount)),
            LedgerEntry::Withdrawal { amount, .. } => {
                self.notify(format!("{} TON sent to your wallet!", amount))
            }
        }
        self.entries.write(LedgerEntryRecorded { entry });
    }
}

#[derive(SystemParam)]
pub struct HostServices<'w> {
    host: ResMut<'w, ActiveHost>,
    clipboard: ResMut<'w, ActiveClipboard>,
}

pub fn restore_ledger(
    config: Res<RewardConfig>,
    host: Option<Res<ActiveHost>>,
    mut ledger: ResMut<RewardLedger>,
    mut welcome: ResMut<WelcomeNotice>,
) {
    if let Some(user) = host.as_ref().and_then(|host| host.host().user()) {
        ledger.adopt_host_user(user.id);
    }

    match ledger.load() {
        Ok(LoadOutcome::FirstRun) => info!(
            target: "rewards",
            "No reward snapshot at {}; starting fresh",
            ledger.store_description()
        ),
        Ok(LoadOutcome::Restored) => info!(
            target: "rewards",
            "Restored reward snapshot: balance {} TON, lifetime {} TON",
            ledger.state().balance,
            ledger.state().total_earned
        ),
        Ok(LoadOutcome::Migrated) => info!(
            target: "rewards",
            "Migrated legacy reward snapshot to the current format"
        ),
        Err(err) => warn!(
            target: "rewards",
            "Reward snapshot at {} rejected ({}); continuing from defaults",
            ledger.store_description(),
            err
        ),
    }

    if ledger.state().total_earned.is_zero() {
        welcome.schedule(config.delays.welcome);
    }
}

pub fn handle_action_requests(
    mut requests: MessageReader<RewardActionRequested>,
    config: Res<RewardConfig>,
    mut ledger: ResMut<RewardLedger>,
    mut backend: ResMut<ActiveActionBackend>,
    mut services: HostServices,
    mut outputs: RewardOutputs,
) {
    for request in requests.read() {
        let action = request.action;
        let result = begin_action(
            action,
            &config,
            &mut ledger,
            &mut backend,
            &mut services,
            &mut outputs,
        );
        if let Err(rejection) = result {
            debug!(target: "rewards", "{} rejected: {}", action, rejection);
            if let Some(text) = rejection.notice() {
                outputs.notify(text);
            }
        }
    }
}

fn begin_action(
    action: ActionKind,
    config: &RewardConfig,
    ledger: &mut RewardLedger,
    backend: &mut ActiveActionBackend,
    services: &mut HostServices,
    outputs: &mut RewardOutputs,
) -> Result<(), ActionRejection> {
    match action {
        ActionKind::TapAd => {
            let entry = ledger.credit_ad_view(config.amounts.tap_ad, CreditSource::TapAd);
            outputs.record(entry);
            return Ok(());
        }
        ActionKind::ShareReferral => {
            share_referral(config, ledger, services, outputs);
            return Ok(());
        }
        ActionKind::CopyReferral => {
            let link = referral_link(&config.referral.bot_username, ledger.state().user_id);
            let text = if copy_to_clipboard(services, &link) {
                "Link copied to clipboard!"
            } else {
                "Please copy the link manually"
            };
            outputs.notify(text);
            return Ok(());
        }
        ActionKind::FollowChannel => {
            if services.host.host().user().is_none() {
                return Err(ActionRejection::HostUserMissing);
            }
        }
        ActionKind::ConnectWallet => ledger.check_wallet_connection()?,
        ActionKind::Withdraw => ledger.check_withdrawal(config.minimum_withdrawal)?,
        ActionKind::WatchAd | ActionKind::VisitSite => {}
    }

    let backend = backend.backend_mut();
    let ticket = backend.submit(action)?;
    debug!(
        target: "rewards",
        "{} submitted to {} backend as {}",
        action,
        backend.name(),
        ticket
    );
    if let Some(text) = action.pending_notice() {
        outputs.notify(text);
    }
    Ok(())
}

fn share_referral(
    config: &RewardConfig,
    ledger: &RewardLedger,
    services: &mut HostServices,
    outputs: &mut RewardOutputs,
) {
    let link = referral_link(&config.referral.bot_username, ledger.state().user_id);

    if services.host.host().user().is_some() {
        match share_url(&link) {
            Some(url) => services.host.host_mut().open_link(url.as_str()),
            None => warn!(target: "rewards", "Could not build share link for {}", link),
        }
        return;
    }

    if copy_to_clipboard(services, &link) {
        outputs.notify("Link copied! Share with friends");
    } else {
        debug!(target: "rewards", "Share fallback could not copy: {}", share_message(&link));
        outputs.notify("Please copy the link manually");
    }
}

fn copy_to_clipboard(services: &mut HostServices, link: &str) -> bool {
    match services.clipboard.write_text(link) {
        Ok(()) => true,
        Err(err) => {
            debug!(target: "rewards", "Clipboard write failed: {}", err);
            false
        }
    }
}

pub fn complete_pending_actions(
    clock: Res<SimulationClock>,
    config: Res<RewardConfig>,
    mut ledger: ResMut<RewardLedger>,
    mut backend: ResMut<ActiveActionBackend>,
    mut outputs: RewardOutputs,
) {
    let completions = backend.backend_mut().poll(clock.last_scaled_delta());
    for completion in completions {
        debug!(
            target: "rewards",
            "{} {} completed",
            completion.action,
            completion.ticket
        );
        let amounts = &config.amounts;
        match completion.action {
            ActionKind::WatchAd => {
                outputs.record(ledger.credit_ad_view(amounts.watch_ad, CreditSource::WatchAd))
            }
            ActionKind::VisitSite => outputs.record(
                ledger.credit_ad_view(amounts.visit_site, CreditSource::VisitSite),
            ),
            ActionKind::FollowChannel => outputs.record(
                ledger.credit(amounts.follow_channel, CreditSource::FollowChannel),
            ),
            ActionKind::ConnectWallet => {
                if ledger.connect_wallet() {
                    info!(target: "rewards", "Wallet connected for user {}", ledger.state().user_id);
                    outputs.notify("Wallet connected successfully!");
                } else {
                    outputs.notify("Wallet already connected!");
                }
            }
            ActionKind::Withdraw => {
                let entry = ledger.withdraw_all();
                info!(target: "rewards", "Withdrew {} TON", entry.amount());
                outputs.record(entry);
            }
            ActionKind::TapAd | ActionKind::ShareReferral | ActionKind::CopyReferral => {
                warn!(
                    target: "rewards",
                    "Backend completed {} which never goes through it",
                    completion.action
                );
            }
        }
    }
}

pub fn roll_simulated_events(
    clock: Res<SimulationClock>,
    config: Res<RewardConfig>,
    mut feed: ResMut<SimulatedEventFeed>,
    mut ledger: ResMut<RewardLedger>,
    mut outputs: RewardOutputs,
) {
    let fired = feed.tick(clock.last_scaled_delta());
    for _ in 0..fired {
        let (advance, entry) =
            ledger.apply_referral(config.amounts.referral, config.amounts.quest_bonus);
        outputs.record(entry);
        match advance {
            QuestAdvance::Completed => outputs.notify(format!(
                "🎯 Daily quest completed! +{} TON",
                config.amounts.quest_bonus.to_compact_string()
            )),
            QuestAdvance::Progressed { .. } => outputs.notify(format!(
                "👥 New referral! +{} TON",
                config.amounts.referral.to_compact_string()
            )),
        }
    }
}

pub fn show_welcome_notice(
    clock: Res<SimulationClock>,
    mut welcome: ResMut<WelcomeNotice>,
    mut outputs: RewardOutputs,
) {
    if welcome.tick(clock.last_scaled_delta()) {
        outputs.notify(WELCOME_TEXT);
    }
}

pub fn log_rewards_startup(
    ledger: Res<RewardLedger>,
    backend: Res<ActiveActionBackend>,
    feed: Res<SimulatedEventFeed>,
) {
    info!(
        "RewardsPlugin initialised: user {}, {} action backend, simulated feed {}",
        ledger.state().user_id,
        backend.backend().name(),
        if feed.is_enabled() {
            format!("every {:.1}s", feed.interval().as_secs_f32())
        } else {
            "disabled".to_string()
        }
    );
}
